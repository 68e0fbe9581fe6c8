// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Derived progress statistics.

use crate::model::{Catalog, ProgressStatus};
use crate::progress::ProgressStore;

/// Aggregate progress for one roadmap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStats {
    pub total: usize,
    pub completed: usize,
    pub learning: usize,
    pub percentage: u8,
}

/// Computes stats for `roadmap_id`.
///
/// `total` is the current catalog size of the roadmap. `completed` and `learning` only count
/// nodes that are still in the catalog, so orphaned entries kept by reconciliation never
/// inflate the numerator and `percentage` stays within `0..=100`.
pub fn stats(catalog: &Catalog, store: &ProgressStore, roadmap_id: &str) -> ProgressStats {
    let Some(roadmap) = catalog.roadmap(roadmap_id) else {
        return ProgressStats::default();
    };

    let total = roadmap.nodes().len();
    let mut completed = 0usize;
    let mut learning = 0usize;
    if let Some(entry) = store.entry(roadmap_id) {
        for node_id in roadmap.node_ids() {
            match entry.status(node_id.as_str()) {
                ProgressStatus::Completed => completed += 1,
                ProgressStatus::Learning => learning += 1,
                ProgressStatus::NotStarted | ProgressStatus::Skipped => {}
            }
        }
    }

    ProgressStats {
        total,
        completed,
        learning,
        percentage: percentage(completed, total),
    }
}

/// `completed / total * 100` rounded half-up; 0 when `total` is 0.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u128;
    let total = total as u128;
    // floor(x + 1/2) with x = 100 * completed / total, kept in integers.
    let rounded = (200 * completed + total) / (2 * total);
    rounded.min(100) as u8
}

/// Plain-text table of every catalog roadmap's stats, one row per roadmap.
pub fn render_table(catalog: &Catalog, store: &ProgressStore) -> String {
    let id_width = catalog
        .roadmaps()
        .iter()
        .map(|roadmap| roadmap.id().as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("ROADMAP".len());

    let mut out = format!(
        "{:<id_width$}  {:>9}  {:>8}  {:>4}\n",
        "ROADMAP", "COMPLETED", "LEARNING", "PCT"
    );
    for roadmap in catalog.roadmaps() {
        let roadmap_id = roadmap.id().as_str();
        let row = stats(catalog, store, roadmap_id);
        let completed = format!("{}/{}", row.completed, row.total);
        out.push_str(&format!(
            "{roadmap_id:<id_width$}  {completed:>9}  {:>8}  {:>3}%\n",
            row.learning, row.percentage
        ));
    }
    out
}
