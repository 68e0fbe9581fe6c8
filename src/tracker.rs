// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session-scoped owner of the progress store.
//!
//! The presentation layer never touches [`ProgressStore`] directly; it sends
//! [`UpdateIntent`]s to [`Tracker::apply`], which mutates the store and persists it.

use crate::model::{Catalog, PrerequisiteRef, ProgressStatus};
use crate::progress::ProgressStore;
use crate::stats::{self, ProgressStats};
use crate::store::{MemorySink, ProgressSink};

/// Request to set one node's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateIntent {
    pub roadmap_id: String,
    pub node_id: String,
    pub status: ProgressStatus,
}

impl UpdateIntent {
    pub fn new(
        roadmap_id: impl Into<String>,
        node_id: impl Into<String>,
        status: ProgressStatus,
    ) -> Self {
        Self {
            roadmap_id: roadmap_id.into(),
            node_id: node_id.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Persisted,
    /// The in-memory store was updated but writing it out failed.
    PersistFailed,
}

pub struct Tracker<S> {
    catalog: Catalog,
    store: ProgressStore,
    sink: S,
    last_persist_error: Option<String>,
}

impl<S: ProgressSink> Tracker<S> {
    /// Loads `raw_blob`, reconciles it against `catalog`, and writes the result back when
    /// reconciliation added entries.
    pub fn open(catalog: Catalog, raw_blob: Option<&str>, sink: S) -> Self {
        let mut store = ProgressStore::load(raw_blob);
        let backfilled = store.reconcile_in_place(&catalog);
        tracing::info!(roadmaps = store.len(), backfilled, "progress ready");

        let mut tracker = Self {
            catalog,
            store,
            sink,
            last_persist_error: None,
        };
        if backfilled > 0 {
            tracker.persist();
        }
        tracker
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn status(&self, roadmap_id: &str, node_id: &str) -> ProgressStatus {
        self.store.status(roadmap_id, node_id)
    }

    pub fn stats(&self, roadmap_id: &str) -> ProgressStats {
        stats::stats(&self.catalog, &self.store, roadmap_id)
    }

    pub fn prerequisite_title(&self, roadmap_id: &str, prerequisite: &PrerequisiteRef) -> String {
        self.catalog.prerequisite_title(roadmap_id, prerequisite)
    }

    /// The single mutation entry point: sets one status, then persists the whole store.
    ///
    /// A failed write is logged and reported in the outcome; the in-memory update stands.
    pub fn apply(&mut self, intent: UpdateIntent) -> ApplyOutcome {
        self.store
            .set_status(&intent.roadmap_id, &intent.node_id, intent.status);
        self.persist()
    }

    /// Marks every current catalog node of `roadmap_id` as not started.
    ///
    /// Goes through [`Tracker::apply`] per node; orphaned entries are left as they are.
    pub fn reset_roadmap(&mut self, roadmap_id: &str) -> ApplyOutcome {
        let node_ids = self
            .catalog
            .roadmap(roadmap_id)
            .map(|roadmap| {
                roadmap
                    .node_ids()
                    .filter(|node_id| {
                        self.store.status(roadmap_id, node_id.as_str()) != ProgressStatus::NotStarted
                    })
                    .map(|node_id| node_id.as_str().to_owned())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let mut outcome = ApplyOutcome::Persisted;
        for node_id in node_ids {
            if self.apply(UpdateIntent::new(roadmap_id, node_id, ProgressStatus::NotStarted))
                == ApplyOutcome::PersistFailed
            {
                outcome = ApplyOutcome::PersistFailed;
            }
        }
        outcome
    }

    fn persist(&mut self) -> ApplyOutcome {
        match self.sink.persist(&self.store) {
            Ok(()) => {
                self.last_persist_error = None;
                ApplyOutcome::Persisted
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot persist progress; keeping in-memory state");
                self.last_persist_error = Some(err.to_string());
                ApplyOutcome::PersistFailed
            }
        }
    }

    /// Takes the pending persistence error so the caller can report it once.
    pub fn take_persist_error(&mut self) -> Option<String> {
        self.last_persist_error.take()
    }
}

impl Tracker<MemorySink> {
    /// A read-only view of `raw_blob`: reconciled in memory, never written anywhere.
    pub fn snapshot(catalog: Catalog, raw_blob: Option<&str>) -> Self {
        Self::open(catalog, raw_blob, MemorySink::new())
    }
}

impl<S> std::fmt::Debug for Tracker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("roadmaps", &self.catalog.roadmaps().len())
            .field("store", &self.store)
            .field("last_persist_error", &self.last_persist_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{ApplyOutcome, Tracker, UpdateIntent};
    use crate::model::{Catalog, Node, NodeId, ProgressStatus, Roadmap, RoadmapId};
    use crate::progress::ProgressStore;
    use crate::stats::ProgressStats;
    use crate::store::{MemorySink, ProgressSink, StoreError};

    fn catalog() -> Catalog {
        let roadmap = ["a", "b", "c"].iter().fold(
            Roadmap::new(RoadmapId::new("r1").expect("id"), "R1"),
            |roadmap, node_id| {
                roadmap.with_node(Node::new(NodeId::new(*node_id).expect("id"), *node_id))
            },
        );
        Catalog::new(vec![roadmap]).expect("catalog")
    }

    struct FailingSink {
        fail: Rc<Cell<bool>>,
    }

    impl ProgressSink for FailingSink {
        fn persist(&mut self, _store: &ProgressStore) -> Result<(), StoreError> {
            if self.fail.get() {
                Err(StoreError::Io {
                    path: "progress.json".into(),
                    source: std::io::Error::other("quota exceeded"),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn open_backfills_and_persists_once() {
        let tracker = Tracker::open(catalog(), None, MemorySink::new());

        assert_eq!(tracker.sink().writes(), 1);
        let persisted = ProgressStore::load(tracker.sink().blob());
        assert_eq!(&persisted, tracker.store());
        assert_eq!(persisted.entry("r1").map(|entry| entry.len()), Some(3));
    }

    #[test]
    fn open_skips_the_write_when_nothing_changed() {
        let blob = r#"{"r1": {"a": "completed", "b": "not-started", "c": "learning"}}"#;
        let tracker = Tracker::open(catalog(), Some(blob), MemorySink::new());

        assert_eq!(tracker.sink().writes(), 0);
        assert_eq!(tracker.status("r1", "a"), ProgressStatus::Completed);
    }

    #[test]
    fn snapshot_reconciles_without_a_backing_file() {
        let blob = r#"{"r1": {"a": "completed"}}"#;
        let tracker = Tracker::snapshot(catalog(), Some(blob));

        assert_eq!(tracker.store().entry("r1").map(|entry| entry.len()), Some(3));
        assert_eq!(tracker.stats("r1").percentage, 33);
        assert!(tracker.last_persist_error().is_none());
    }

    #[test]
    fn every_apply_persists_the_full_store() {
        let mut tracker = Tracker::open(catalog(), None, MemorySink::new());

        let outcome = tracker.apply(UpdateIntent::new("r1", "b", ProgressStatus::Completed));
        assert_eq!(outcome, ApplyOutcome::Persisted);
        tracker.apply(UpdateIntent::new("r1", "c", ProgressStatus::Learning));

        assert_eq!(tracker.sink().writes(), 3);
        let persisted = ProgressStore::load(tracker.sink().blob());
        assert_eq!(persisted.get("r1", "b"), Some(ProgressStatus::Completed));
        assert_eq!(persisted.get("r1", "c"), Some(ProgressStatus::Learning));
        assert_eq!(
            tracker.stats("r1"),
            ProgressStats {
                total: 3,
                completed: 1,
                learning: 1,
                percentage: 33,
            }
        );
    }

    #[test]
    fn failed_persistence_keeps_in_memory_state() {
        let fail = Rc::new(Cell::new(false));
        let mut tracker = Tracker::open(catalog(), None, FailingSink { fail: fail.clone() });
        assert!(tracker.last_persist_error().is_none());

        fail.set(true);
        let outcome = tracker.apply(UpdateIntent::new("r1", "a", ProgressStatus::Completed));
        assert_eq!(outcome, ApplyOutcome::PersistFailed);
        assert_eq!(tracker.status("r1", "a"), ProgressStatus::Completed);
        assert!(tracker
            .last_persist_error()
            .is_some_and(|err| err.contains("quota exceeded")));

        fail.set(false);
        tracker.apply(UpdateIntent::new("r1", "b", ProgressStatus::Learning));
        assert!(tracker.last_persist_error().is_none());
        assert_eq!(tracker.status("r1", "a"), ProgressStatus::Completed);
    }

    #[test]
    fn reset_roadmap_clears_catalog_nodes_and_keeps_orphans() {
        let blob = r#"{"r1": {"a": "completed", "b": "learning", "gone": "completed"}}"#;
        let mut tracker = Tracker::open(catalog(), Some(blob), MemorySink::new());

        tracker.reset_roadmap("r1");

        assert_eq!(tracker.status("r1", "a"), ProgressStatus::NotStarted);
        assert_eq!(tracker.status("r1", "b"), ProgressStatus::NotStarted);
        assert_eq!(tracker.store().get("r1", "gone"), Some(ProgressStatus::Completed));
        assert_eq!(tracker.stats("r1").completed, 0);
    }
}
