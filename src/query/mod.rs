// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only lookups over the catalog that back the UI.

use crate::model::{Catalog, Node, PrerequisiteRef, Resource, ResourceKind, Roadmap};

const DESCRIPTION_PENALTY: i64 = 100_000;

/// Resolves a raw prerequisite string to a display title.
///
/// Unparseable strings and unresolved references both fall back to the raw text.
pub fn resolve_prerequisite_title(catalog: &Catalog, current_roadmap_id: &str, raw: &str) -> String {
    match PrerequisiteRef::parse(raw) {
        Ok(prerequisite) => catalog.prerequisite_title(current_roadmap_id, &prerequisite),
        Err(_) => raw.to_owned(),
    }
}

/// Display titles for every prerequisite of `node`, in declaration order.
pub fn prerequisite_titles(catalog: &Catalog, roadmap_id: &str, node: &Node) -> Vec<String> {
    node.prerequisites()
        .iter()
        .map(|prerequisite| catalog.prerequisite_title(roadmap_id, prerequisite))
        .collect()
}

/// Display order of resource groups in the node detail view.
pub const RESOURCE_GROUP_ORDER: [ResourceKind; 6] = [
    ResourceKind::ProjectChallenge,
    ResourceKind::InteractiveTutorial,
    ResourceKind::Video,
    ResourceKind::Article,
    ResourceKind::Book,
    ResourceKind::OfficialDocs,
];

/// Groups `node`'s resources by kind in [`RESOURCE_GROUP_ORDER`]; untyped resources come last
/// under `None`. Empty groups are omitted.
pub fn resource_groups(node: &Node) -> Vec<(Option<ResourceKind>, Vec<&Resource>)> {
    let kinds = RESOURCE_GROUP_ORDER.iter().copied().map(Some).chain([None]);
    kinds
        .filter_map(|kind| {
            let members = node
                .resources()
                .iter()
                .filter(|resource| resource.kind == kind)
                .collect::<Vec<_>>();
            (!members.is_empty()).then_some((kind, members))
        })
        .collect()
}

/// Indices into `roadmap.nodes()` that match `query`, best match first.
///
/// Matches title, id, category, and description. Substring hits outrank fuzzy subsequence
/// hits. An empty query matches every node in catalog order.
pub fn search_nodes(roadmap: &Roadmap, query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return (0..roadmap.nodes().len()).collect();
    }

    let mut scored = roadmap
        .nodes()
        .iter()
        .enumerate()
        .filter_map(|(idx, node)| node_score(&needle, node).map(|score| (score, idx)))
        .collect::<Vec<_>>();
    scored.sort_by(|(score_a, idx_a), (score_b, idx_b)| {
        score_b.cmp(score_a).then_with(|| idx_a.cmp(idx_b))
    });
    scored.into_iter().map(|(_, idx)| idx).collect()
}

fn node_score(needle: &str, node: &Node) -> Option<i64> {
    // Description hits rank below hits on the shorter fields.
    let haystacks = [
        (node.title().to_lowercase(), 0),
        (node.id().as_str().to_lowercase(), 0),
        (node.category().to_lowercase(), 0),
        (node.description().to_lowercase(), DESCRIPTION_PENALTY),
    ];

    let regular = haystacks
        .iter()
        .filter_map(|(haystack, penalty)| regular_score(needle, haystack).map(|s| s - penalty))
        .max();
    if regular.is_some() {
        return regular;
    }

    haystacks
        .iter()
        .filter_map(|(haystack, penalty)| fuzzy_score(needle, haystack).map(|s| s - penalty))
        .max()
}

fn regular_score(needle: &str, haystack: &str) -> Option<i64> {
    let first = haystack.find(needle)?;
    let starts = first == 0;
    let start_boundary =
        starts || haystack[..first].chars().last().is_some_and(is_boundary_char);

    let mut score = 200_000i64.saturating_sub((first as i64) * 1000);
    score -= haystack.chars().count() as i64;
    if starts {
        score += 50_000;
    }
    if start_boundary {
        score += 20_000;
    }
    if haystack == needle {
        score += 100_000;
    }
    Some(score)
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());

    let mut score = (ratio * 1000.0).round() as i64;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    Some(score)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

/// Positions of `needle` as an in-order subsequence of `haystack`, if it is one.
fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut wanted = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last = 0usize;
    let mut prev_match: Option<usize> = None;
    let mut consecutive = 0usize;
    let mut start_boundary = false;
    let mut prev_char: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = wanted.peek() else {
            break;
        };
        if ch == want {
            wanted.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_char.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }
        prev_char = Some(ch);
    }

    if wanted.peek().is_some() {
        return None;
    }
    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last - first + 1,
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '/' | '-' | '_' | ' ' | '(' | '&')
}
