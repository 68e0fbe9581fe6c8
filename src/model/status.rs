// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-topic progress marker.
///
/// These are independent states rather than a scale; `NotStarted` is only special in that it
/// is the value implied by a missing entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    Learning,
    Completed,
    Skipped,
}

impl ProgressStatus {
    pub const ALL: [Self; 4] = [
        Self::NotStarted,
        Self::Learning,
        Self::Completed,
        Self::Skipped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::Learning => "learning",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::Learning => "Learning",
            Self::Completed => "Completed",
            Self::Skipped => "Skipped",
        }
    }

    /// Next status in the UI cycle (not-started → learning → completed → skipped → …).
    pub fn cycle(self) -> Self {
        match self {
            Self::NotStarted => Self::Learning,
            Self::Learning => Self::Completed,
            Self::Completed => Self::Skipped,
            Self::Skipped => Self::NotStarted,
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid progress status: {0:?}")]
pub struct ParseProgressStatusError(pub String);

impl FromStr for ProgressStatus {
    type Err = ParseProgressStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-started" => Ok(Self::NotStarted),
            "learning" => Ok(Self::Learning),
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            _ => Err(ParseProgressStatusError(s.to_owned())),
        }
    }
}
