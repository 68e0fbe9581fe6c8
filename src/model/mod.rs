// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Curriculum and progress data model.
//!
//! A catalog holds roadmaps; each roadmap holds nodes (topics) and prerequisite connections.

pub mod catalog;
pub mod ids;
pub mod prerequisite;
pub mod roadmap;
pub mod status;

pub use catalog::{Catalog, CatalogError};
pub use ids::{Id, IdError, NodeId, RoadmapId};
pub use prerequisite::{ParsePrerequisiteRefError, PrerequisiteRef};
pub use roadmap::{Connection, Difficulty, Node, Position, Resource, ResourceKind, Roadmap};
pub use status::{ParseProgressStatusError, ProgressStatus};
