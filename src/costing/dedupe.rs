// ABOUTME: Link deduplication collapsing repeated parent-to-target links into one
// ABOUTME: Sums quantities in first-occurrence order and flags merges whose units differ
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use recipe_core::models::{Link, LinkId, LinkTarget, RecipeId, UnitConflict};
use std::collections::HashMap;

/// A link after duplicates have been folded into it
#[derive(Debug, Clone, PartialEq)]
pub struct MergedLink {
    /// First occurrence, carrying the summed quantity
    pub link: Link,
    /// Every link folded into this one, first occurrence included
    pub source_ids: Vec<LinkId>,
}

/// Result of deduplicating a link list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deduplication {
    /// Merged links in first-occurrence order
    pub links: Vec<MergedLink>,
    /// Number of links folded into an earlier one
    pub merged: u32,
    /// Merges whose units disagreed; the first unit was kept
    pub unit_conflicts: Vec<UnitConflict>,
}

/// Collapse links sharing a parent and a referenced ingredient or sub-recipe
///
/// Quantities are summed onto the first occurrence, whose unit and note are
/// kept. Cost is never merged here: callers price the merged quantity once.
/// Links with no valid target have no merge key and pass through unchanged.
/// Deterministic for a given input order, and idempotent.
#[must_use]
pub fn dedupe_links<'a, I>(links: I) -> Deduplication
where
    I: IntoIterator<Item = &'a Link>,
{
    let mut result = Deduplication::default();
    let mut positions: HashMap<(RecipeId, LinkTarget), usize> = HashMap::new();

    for link in links {
        let Some(target) = link.target() else {
            result.links.push(MergedLink {
                link: link.clone(),
                source_ids: vec![link.id],
            });
            continue;
        };

        let key = (link.parent_recipe_id, target);
        if let Some(&position) = positions.get(&key) {
            let merged = &mut result.links[position];
            if !merged.link.unit.eq_ignore_ascii_case(&link.unit) {
                result.unit_conflicts.push(UnitConflict {
                    parent_recipe_id: link.parent_recipe_id,
                    kept_unit: merged.link.unit.clone(),
                    dropped_unit: link.unit.clone(),
                });
            }
            merged.link.quantity += link.quantity;
            merged.source_ids.push(link.id);
            result.merged += 1;
        } else {
            positions.insert(key, result.links.len());
            result.links.push(MergedLink {
                link: link.clone(),
                source_ids: vec![link.id],
            });
        }
    }

    result
}

/// Plain link-list form of [`dedupe_links`]
#[must_use]
pub fn dedupe(links: &[Link]) -> Vec<Link> {
    dedupe_links(links)
        .links
        .into_iter()
        .map(|merged| merged.link)
        .collect()
}
