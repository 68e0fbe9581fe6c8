// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::ProgressSink;
use crate::progress::ProgressStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("cannot encode progress: {source}")]
    Encode { source: serde_json::Error },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, no fsync. A crash can lose the latest status change
    /// but never leaves a half-written progress file.
    #[default]
    BestEffort,

    /// Also fsyncs the temp file and its directory around the rename, where the
    /// platform allows it.
    Durable,
}

/// The progress blob on disk.
#[derive(Debug, Clone)]
pub struct ProgressFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl ProgressFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored blob; `Ok(None)` when nothing has been saved yet.
    pub fn read_blob(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Reads the stored blob, treating any read failure like a missing blob.
    pub fn read_blob_or_none(&self) -> Option<String> {
        match self.read_blob() {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "cannot read stored progress; starting empty");
                None
            }
        }
    }

    pub fn save(&self, store: &ProgressStore) -> Result<(), StoreError> {
        let blob = store
            .to_blob()
            .map_err(|source| StoreError::Encode { source })?;
        write_atomic(&self.path, blob.as_bytes(), self.durability)?;
        tracing::debug!(path = %self.path.display(), bytes = blob.len(), "progress saved");
        Ok(())
    }
}

impl ProgressSink for ProgressFile {
    fn persist(&mut self, store: &ProgressStore) -> Result<(), StoreError> {
        self.save(store)
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|source| StoreError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".trailmap.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    write_temp_file(&tmp_path, |file| {
        file.write_all(contents)?;
        if durability == WriteDurability::Durable {
            file.sync_all()?;
        }
        Ok(())
    })?;

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

/// Creates `tmp_path` and fills it. On any failure the temp file is removed before the
/// error is returned.
fn write_temp_file(
    tmp_path: &Path,
    fill: impl FnOnce(&mut fs::File) -> io::Result<()>,
) -> Result<(), StoreError> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.to_path_buf(),
            source,
        })?;

    let filled = fill(&mut file);
    drop(file);
    filled.map_err(|source| {
        let _ = fs::remove_file(tmp_path);
        StoreError::Io {
            path: tmp_path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests;
