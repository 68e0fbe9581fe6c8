// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::ids::{NodeId, RoadmapId};
use super::prerequisite::PrerequisiteRef;
use super::roadmap::Roadmap;

/// Immutable, validated collection of roadmaps.
///
/// Progress tracking treats the catalog as read-only input; a new release may replace it
/// wholesale with nodes added, removed or renamed.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    roadmaps: Vec<Roadmap>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot parse catalog json: {0}")]
    Json(String),
    #[error("duplicate roadmap id {roadmap_id}")]
    DuplicateRoadmap { roadmap_id: RoadmapId },
    #[error("duplicate node id {node_id} in roadmap {roadmap_id}")]
    DuplicateNode {
        roadmap_id: RoadmapId,
        node_id: NodeId,
    },
    #[error("connection {from} -> {to} in roadmap {roadmap_id} names an unknown node")]
    DanglingConnection {
        roadmap_id: RoadmapId,
        from: NodeId,
        to: NodeId,
    },
    #[error("node {node_id} in roadmap {roadmap_id} lists unknown prerequisite {prerequisite}")]
    UnknownPrerequisite {
        roadmap_id: RoadmapId,
        node_id: NodeId,
        prerequisite: PrerequisiteRef,
    },
    #[error("connections in roadmap {roadmap_id} contain a cycle")]
    Cycle { roadmap_id: RoadmapId },
}

impl Catalog {
    pub fn new(roadmaps: Vec<Roadmap>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for roadmap in &roadmaps {
            if !seen.insert(roadmap.id().as_str()) {
                return Err(CatalogError::DuplicateRoadmap {
                    roadmap_id: roadmap.id().clone(),
                });
            }
            validate_roadmap(roadmap)?;
        }
        Ok(Self { roadmaps })
    }

    /// Parses a catalog from a JSON array of roadmaps.
    pub fn from_json(input: &str) -> Result<Self, CatalogError> {
        let roadmaps: Vec<Roadmap> =
            serde_json::from_str(input).map_err(|err| CatalogError::Json(err.to_string()))?;
        Self::new(roadmaps)
    }

    pub fn roadmaps(&self) -> &[Roadmap] {
        &self.roadmaps
    }

    pub fn roadmap(&self, roadmap_id: &str) -> Option<&Roadmap> {
        self.roadmaps
            .iter()
            .find(|roadmap| roadmap.id().as_str() == roadmap_id)
    }

    /// Title to display for `prerequisite` as seen from `current_roadmap_id`.
    ///
    /// Falls back to the reference text when the roadmap or node is unknown.
    pub fn prerequisite_title(
        &self,
        current_roadmap_id: &str,
        prerequisite: &PrerequisiteRef,
    ) -> String {
        let roadmap_id = prerequisite
            .roadmap_id()
            .map(|id| id.as_str())
            .unwrap_or(current_roadmap_id);

        self.roadmap(roadmap_id)
            .and_then(|roadmap| roadmap.node(prerequisite.node_id().as_str()))
            .map(|node| node.title().to_owned())
            .unwrap_or_else(|| prerequisite.to_string())
    }
}

fn validate_roadmap(roadmap: &Roadmap) -> Result<(), CatalogError> {
    let mut node_ids = BTreeSet::new();
    for node in roadmap.nodes() {
        if !node_ids.insert(node.id().as_str()) {
            return Err(CatalogError::DuplicateNode {
                roadmap_id: roadmap.id().clone(),
                node_id: node.id().clone(),
            });
        }
    }

    for connection in roadmap.connections() {
        if !node_ids.contains(connection.from.as_str()) || !node_ids.contains(connection.to.as_str())
        {
            return Err(CatalogError::DanglingConnection {
                roadmap_id: roadmap.id().clone(),
                from: connection.from.clone(),
                to: connection.to.clone(),
            });
        }
    }

    for node in roadmap.nodes() {
        for prerequisite in node.prerequisites() {
            let names_this_roadmap = prerequisite
                .roadmap_id()
                .map_or(true, |id| id == roadmap.id());
            if names_this_roadmap && !node_ids.contains(prerequisite.node_id().as_str()) {
                return Err(CatalogError::UnknownPrerequisite {
                    roadmap_id: roadmap.id().clone(),
                    node_id: node.id().clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }
    }

    if has_cycle(roadmap) {
        return Err(CatalogError::Cycle {
            roadmap_id: roadmap.id().clone(),
        });
    }

    Ok(())
}

// Kahn's algorithm over the connection list.
fn has_cycle(roadmap: &Roadmap) -> bool {
    let mut in_degree = roadmap
        .node_ids()
        .map(|id| (id.as_str(), 0usize))
        .collect::<BTreeMap<_, _>>();
    let mut outgoing = BTreeMap::<&str, Vec<&str>>::new();
    for connection in roadmap.connections() {
        outgoing
            .entry(connection.from.as_str())
            .or_default()
            .push(connection.to.as_str());
        if let Some(degree) = in_degree.get_mut(connection.to.as_str()) {
            *degree += 1;
        }
    }

    let mut ready = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect::<VecDeque<_>>();
    let mut visited = 0usize;
    while let Some(id) = ready.pop_front() {
        visited += 1;
        for next in outgoing.get(id).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(*next);
                }
            }
        }
    }

    visited != in_degree.len()
}
