// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::ProgressEntry;
use crate::model::ProgressStatus;

/// Schema version written by [`encode`].
///
/// Version 0 is the legacy bare map `{roadmap: {node: status}}` without an envelope.
pub const CURRENT_SCHEMA_VERSION: u64 = 1;

const SCHEMA_VERSION_KEY: &str = "schemaVersion";
const PROGRESS_KEY: &str = "progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobOrigin {
    /// No blob was stored.
    Absent,
    /// The blob was not valid JSON, or its top level was not an object.
    Malformed,
    /// Bare `{roadmap: {node: status}}` map.
    Legacy,
    /// `{"schemaVersion": n, "progress": {...}}` envelope.
    Versioned(u64),
}

/// What [`decode`] recovered from a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub origin: BlobOrigin,
    pub dropped_roadmaps: Vec<String>,
    pub dropped_entries: Vec<(String, String)>,
}

impl LoadReport {
    fn new(origin: BlobOrigin) -> Self {
        Self {
            origin,
            dropped_roadmaps: Vec::new(),
            dropped_entries: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.dropped_roadmaps.is_empty() && self.dropped_entries.is_empty()
    }

    pub(super) fn log(&self) {
        match self.origin {
            BlobOrigin::Absent => tracing::debug!("no stored progress; starting empty"),
            BlobOrigin::Malformed => {
                tracing::warn!("stored progress is malformed; starting with empty progress")
            }
            BlobOrigin::Legacy => tracing::info!("migrating unversioned progress blob"),
            BlobOrigin::Versioned(version) if version > CURRENT_SCHEMA_VERSION => tracing::warn!(
                version,
                supported = CURRENT_SCHEMA_VERSION,
                "progress blob is newer than this build; loading known entries"
            ),
            BlobOrigin::Versioned(_) => {}
        }

        if !self.is_clean() {
            tracing::warn!(
                dropped_roadmaps = self.dropped_roadmaps.len(),
                dropped_entries = self.dropped_entries.len(),
                "dropped malformed progress entries"
            );
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    schema_version: u64,
    progress: &'a BTreeMap<String, ProgressEntry>,
}

pub(super) fn encode(roadmaps: &BTreeMap<String, ProgressEntry>) -> Result<String, serde_json::Error> {
    let envelope = Envelope {
        schema_version: CURRENT_SCHEMA_VERSION,
        progress: roadmaps,
    };
    let mut out = serde_json::to_string_pretty(&envelope)?;
    out.push('\n');
    Ok(out)
}

pub(super) fn decode(raw: Option<&str>) -> (BTreeMap<String, ProgressEntry>, LoadReport) {
    let Some(raw) = raw else {
        return (BTreeMap::new(), LoadReport::new(BlobOrigin::Absent));
    };

    let top = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(top)) => top,
        Ok(_) => return (BTreeMap::new(), LoadReport::new(BlobOrigin::Malformed)),
        Err(err) => {
            tracing::debug!(error = %err, "progress blob is not valid json");
            return (BTreeMap::new(), LoadReport::new(BlobOrigin::Malformed));
        }
    };

    let (origin, payload, shadowed) = split_envelope(top);
    let mut report = LoadReport::new(origin);
    report.dropped_roadmaps.extend(shadowed);
    let roadmaps = validate_payload(payload, &mut report);
    (roadmaps, report)
}

// A numeric `schemaVersion` cannot be a legacy roadmap entry (those are objects), so its
// presence alongside an object `progress` identifies the envelope unambiguously.
//
// Other top-level keys of an envelope are read as legacy roadmaps so their progress
// survives. A key that collides with a roadmap inside `progress` loses and is returned
// as shadowed.
fn split_envelope(mut top: Map<String, Value>) -> (BlobOrigin, Map<String, Value>, Vec<String>) {
    let version = top.get(SCHEMA_VERSION_KEY).and_then(schema_version);
    let has_payload = top.get(PROGRESS_KEY).is_some_and(Value::is_object);

    let Some(version) = version.filter(|_| has_payload) else {
        return (BlobOrigin::Legacy, top, Vec::new());
    };

    top.remove(SCHEMA_VERSION_KEY);
    let mut payload = match top.remove(PROGRESS_KEY) {
        Some(Value::Object(payload)) => payload,
        _ => Map::new(),
    };
    let mut shadowed = Vec::new();
    for (roadmap_id, value) in top {
        if payload.contains_key(&roadmap_id) {
            shadowed.push(roadmap_id);
        } else {
            payload.insert(roadmap_id, value);
        }
    }
    (BlobOrigin::Versioned(version), payload, shadowed)
}

// Any JSON number counts. Fractional or negative versions round up, clamped at zero.
fn schema_version(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|version| version.max(0.0).ceil() as u64))
}

fn validate_payload(
    payload: Map<String, Value>,
    report: &mut LoadReport,
) -> BTreeMap<String, ProgressEntry> {
    let mut roadmaps = BTreeMap::new();
    for (roadmap_id, value) in payload {
        let Value::Object(nodes) = value else {
            report.dropped_roadmaps.push(roadmap_id);
            continue;
        };

        let mut statuses = Vec::with_capacity(nodes.len());
        for (node_id, status) in nodes {
            match status.as_str().and_then(|s| s.parse::<ProgressStatus>().ok()) {
                Some(status) => statuses.push((node_id, status)),
                None => report.dropped_entries.push((roadmap_id.clone(), node_id)),
            }
        }
        roadmaps.insert(roadmap_id, statuses.into_iter().collect());
    }
    roadmaps
}
