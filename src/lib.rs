// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Trailmap: learning-roadmap progress tracker (catalog + progress store + TUI).
//!
//! The progress store is the core: it loads a persisted blob, reconciles it against the
//! catalog, applies status updates, and feeds stats to the terminal UI.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod progress;
pub mod query;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod tui;
