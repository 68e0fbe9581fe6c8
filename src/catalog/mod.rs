// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Curriculum sources: the compiled-in catalog and catalog files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{Catalog, CatalogError};

const BUILTIN_CATALOG_JSON: &str = include_str!("builtin.json");

/// The curriculum shipped with this release.
pub fn builtin_catalog() -> Catalog {
    Catalog::from_json(BUILTIN_CATALOG_JSON).expect("built-in catalog is valid")
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogFileError {
    #[error("cannot read catalog {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid catalog {path:?}: {source}")]
    Invalid { path: PathBuf, source: CatalogError },
}

/// Reads and validates a JSON catalog file (an array of roadmaps).
pub fn load_catalog_file(path: &Path) -> Result<Catalog, CatalogFileError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_json(&raw).map_err(|source| CatalogFileError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        roadmaps = catalog.roadmaps().len(),
        "loaded catalog file"
    );
    Ok(catalog)
}
