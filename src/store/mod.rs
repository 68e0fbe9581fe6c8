// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for progress on disk.
//!
//! Progress lives in a single JSON file that is read once at startup and rewritten after
//! every mutation.

use crate::progress::ProgressStore;

pub mod progress_file;

pub use progress_file::{ProgressFile, StoreError, WriteDurability};

/// Destination for the serialized store.
///
/// Called after every mutation with the full store.
pub trait ProgressSink {
    fn persist(&mut self, store: &ProgressStore) -> Result<(), StoreError>;
}

/// Keeps the last persisted blob in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    blob: Option<String>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ProgressSink for MemorySink {
    fn persist(&mut self, store: &ProgressStore) -> Result<(), StoreError> {
        let blob = store.to_blob().map_err(|source| StoreError::Encode { source })?;
        self.blob = Some(blob);
        self.writes += 1;
        Ok(())
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for Box<S> {
    fn persist(&mut self, store: &ProgressStore) -> Result<(), StoreError> {
        (**self).persist(store)
    }
}
