// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-node progress state and its reconciliation against the catalog.
//!
//! The store maps roadmap id -> node id -> [`ProgressStatus`]. Keys are plain strings: updates
//! for roadmaps or nodes the catalog does not know are accepted and kept, and reconciliation
//! only ever adds `not-started` entries.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Catalog, ProgressStatus};

mod blob;

pub use blob::{BlobOrigin, LoadReport, CURRENT_SCHEMA_VERSION};

/// Statuses for the nodes of one roadmap. A missing key means `not-started`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProgressEntry {
    statuses: BTreeMap<String, ProgressStatus>,
}

impl ProgressEntry {
    pub fn get(&self, node_id: &str) -> Option<ProgressStatus> {
        self.statuses.get(node_id).copied()
    }

    pub fn status(&self, node_id: &str) -> ProgressStatus {
        self.get(node_id).unwrap_or_default()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.statuses.contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ProgressStatus)> + '_ {
        self.statuses
            .iter()
            .map(|(node_id, status)| (node_id.as_str(), *status))
    }

    fn set(&mut self, node_id: &str, status: ProgressStatus) {
        self.statuses.insert(node_id.to_owned(), status);
    }

    fn insert_if_absent(&mut self, node_id: &str) -> bool {
        match self.statuses.entry(node_id.to_owned()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(vacant) => {
                vacant.insert(ProgressStatus::NotStarted);
                true
            }
        }
    }
}

impl FromIterator<(String, ProgressStatus)> for ProgressEntry {
    fn from_iter<I: IntoIterator<Item = (String, ProgressStatus)>>(iter: I) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}

/// The persisted record of per-node statuses across all roadmaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressStore {
    roadmaps: BTreeMap<String, ProgressEntry>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a persisted blob.
    ///
    /// Never fails: a missing or unparseable blob yields an empty store, and entries with the
    /// wrong shape are dropped individually. Problems are reported through `tracing`.
    pub fn load(raw: Option<&str>) -> Self {
        Self::load_with_report(raw).0
    }

    /// Like [`ProgressStore::load`], also returning what was recovered from the blob.
    pub fn load_with_report(raw: Option<&str>) -> (Self, LoadReport) {
        let (roadmaps, report) = blob::decode(raw);
        report.log();
        (Self { roadmaps }, report)
    }

    /// Serializes the store as the current versioned blob.
    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        blob::encode(&self.roadmaps)
    }

    pub fn is_empty(&self) -> bool {
        self.roadmaps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roadmaps.len()
    }

    pub fn entry(&self, roadmap_id: &str) -> Option<&ProgressEntry> {
        self.roadmaps.get(roadmap_id)
    }

    pub fn roadmaps(&self) -> impl Iterator<Item = (&str, &ProgressEntry)> + '_ {
        self.roadmaps
            .iter()
            .map(|(roadmap_id, entry)| (roadmap_id.as_str(), entry))
    }

    pub fn get(&self, roadmap_id: &str, node_id: &str) -> Option<ProgressStatus> {
        self.entry(roadmap_id).and_then(|entry| entry.get(node_id))
    }

    pub fn status(&self, roadmap_id: &str, node_id: &str) -> ProgressStatus {
        self.get(roadmap_id, node_id).unwrap_or_default()
    }

    /// Adds a `not-started` entry for every catalog node the store has not seen yet.
    ///
    /// Existing statuses, orphaned nodes and orphaned roadmaps are left untouched. Returns the
    /// number of keys added; a second call with the same catalog returns 0.
    pub fn reconcile_in_place(&mut self, catalog: &Catalog) -> usize {
        let mut backfilled = 0usize;
        for roadmap in catalog.roadmaps() {
            let entry = self
                .roadmaps
                .entry(roadmap.id().as_str().to_owned())
                .or_default();
            for node_id in roadmap.node_ids() {
                if entry.insert_if_absent(node_id.as_str()) {
                    backfilled += 1;
                }
            }
        }

        if backfilled > 0 {
            tracing::debug!(backfilled, "reconciled progress against catalog");
        }
        backfilled
    }

    /// Sets one `(roadmap_id, node_id)` status, creating the entry when needed.
    pub fn set_status(&mut self, roadmap_id: &str, node_id: &str, status: ProgressStatus) {
        self.roadmaps
            .entry(roadmap_id.to_owned())
            .or_default()
            .set(node_id, status);
        tracing::debug!(roadmap_id, node_id, status = %status, "progress updated");
    }
}

/// Returns `store` aligned with the node set of `catalog`. Idempotent.
pub fn reconcile(mut store: ProgressStore, catalog: &Catalog) -> ProgressStore {
    store.reconcile_in_place(catalog);
    store
}

/// Returns `store` with exactly one status changed.
pub fn update(
    mut store: ProgressStore,
    roadmap_id: &str,
    node_id: &str,
    status: ProgressStatus,
) -> ProgressStore {
    store.set_status(roadmap_id, node_id, status);
    store
}
