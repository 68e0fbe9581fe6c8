// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ids::{IdError, NodeId, RoadmapId};

/// Reference from a node to one of its prerequisites.
///
/// Text format:
/// - `<node_id>` names a node in the same roadmap.
/// - `<roadmap_id>/<node_id>` names a node in another roadmap.
///
/// Neither id may contain `/`, so the text form always has at most one separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrerequisiteRef {
    roadmap_id: Option<RoadmapId>,
    node_id: NodeId,
}

impl PrerequisiteRef {
    pub fn local(node_id: NodeId) -> Self {
        Self {
            roadmap_id: None,
            node_id,
        }
    }

    pub fn external(roadmap_id: RoadmapId, node_id: NodeId) -> Self {
        Self {
            roadmap_id: Some(roadmap_id),
            node_id,
        }
    }

    pub fn roadmap_id(&self) -> Option<&RoadmapId> {
        self.roadmap_id.as_ref()
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn is_local(&self) -> bool {
        self.roadmap_id.is_none()
    }

    pub fn parse(input: &str) -> Result<Self, ParsePrerequisiteRefError> {
        match input.split_once('/') {
            None => {
                let node_id =
                    NodeId::new(input.to_owned()).map_err(ParsePrerequisiteRefError::InvalidNodeId)?;
                Ok(Self::local(node_id))
            }
            Some((roadmap_str, node_str)) => {
                if roadmap_str.is_empty() {
                    return Err(ParsePrerequisiteRefError::MissingRoadmapId);
                }
                let roadmap_id = RoadmapId::new(roadmap_str.to_owned())
                    .map_err(ParsePrerequisiteRefError::InvalidRoadmapId)?;
                let node_id = NodeId::new(node_str.to_owned())
                    .map_err(ParsePrerequisiteRefError::InvalidNodeId)?;
                Ok(Self::external(roadmap_id, node_id))
            }
        }
    }
}

impl fmt::Display for PrerequisiteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(roadmap_id) = &self.roadmap_id {
            write!(f, "{roadmap_id}/")?;
        }
        write!(f, "{}", self.node_id)
    }
}

impl FromStr for PrerequisiteRef {
    type Err = ParsePrerequisiteRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PrerequisiteRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PrerequisiteRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsePrerequisiteRefError {
    #[error("prerequisite ref is missing a roadmap id before '/'")]
    MissingRoadmapId,
    #[error("invalid roadmap id in prerequisite ref: {0}")]
    InvalidRoadmapId(IdError),
    #[error("invalid node id in prerequisite ref: {0}")]
    InvalidNodeId(IdError),
}
