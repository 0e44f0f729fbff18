// ABOUTME: Integration tests for recursive recipe cost resolution
// ABOUTME: Q-Factor pricing, sub-recipe expansion, deduplication, depth guard, and soft failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use async_trait::async_trait;
use common::{
    assert_close, create_resolver, ingredient, ingredient_link, recipe, seed, sub_recipe_link,
};
use recipe_core::errors::AppResult;
use recipe_core::models::{
    DetectedCycle, LineKind, LineStatus, Link, LinkId, Recipe, RecipeId,
};
use recipe_cost_server::cache::{RecordLookup, RecordSnapshot};
use recipe_cost_server::costing::{CostResolver, ResolverConfig, SubRecipePricing};
use recipe_cost_server::storage::memory::InMemoryRecordStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed snapshot and recipe headers, no backend involved
struct StaticLookup {
    snapshot: Arc<RecordSnapshot>,
    recipes: HashMap<RecipeId, Recipe>,
}

#[async_trait]
impl RecordLookup for StaticLookup {
    async fn snapshot(&self) -> Arc<RecordSnapshot> {
        Arc::clone(&self.snapshot)
    }

    async fn recipe(&self, id: RecipeId) -> AppResult<Option<Recipe>> {
        Ok(self.recipes.get(&id).cloned())
    }
}

fn default_resolver(store: &InMemoryRecordStore) -> CostResolver {
    create_resolver(store, ResolverConfig::default())
}

#[tokio::test]
async fn test_single_ingredient_recipe_pricing() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 0.5);
    let roll = recipe("Roll", 4, 10.0);
    seed(
        &store,
        &[&rice],
        &[&roll],
        vec![ingredient_link(roll.id, rice.id, 2.0)],
    )
    .await;

    let priced = default_resolver(&store).price(roll).await;

    assert_eq!(priced.lines.len(), 1);
    assert_eq!(priced.lines[0].name, "Rice");
    assert_close(priced.lines[0].total_cost, 1.0);
    assert_close(priced.breakdown.base_cost, 1.0);
    assert_close(priced.breakdown.q_factor_amount, 0.1);
    assert_close(priced.breakdown.total_cost, 1.1);
    assert_close(priced.breakdown.cost_per_serving, 0.275);
    assert!(priced.diagnostics.is_clean());
}

#[tokio::test]
async fn test_sub_recipe_priced_per_serving_consumed() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 0.5);
    let roll = recipe("Roll", 4, 10.0);
    let combo = recipe("Combo", 1, 0.0);
    seed(
        &store,
        &[&rice],
        &[&roll, &combo],
        vec![
            ingredient_link(roll.id, rice.id, 2.0),
            sub_recipe_link(combo.id, roll.id, 2.0),
        ],
    )
    .await;

    let priced = default_resolver(&store).price(combo).await;

    assert_eq!(priced.lines.len(), 1);
    let line = &priced.lines[0];
    assert_eq!(line.name, "[Sub-recipe] Roll");
    assert_eq!(
        line.kind,
        LineKind::SubRecipe {
            recipe_id: roll.id,
            depth: 1
        }
    );
    assert_close(line.unit_cost, 0.275);
    assert_close(line.total_cost, 0.55);
    assert_eq!(line.status, LineStatus::Resolved);
    assert_close(priced.breakdown.total_cost, 0.55);
}

#[tokio::test]
async fn test_sub_recipe_excluding_child_q_factor() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 0.5);
    let roll = recipe("Roll", 4, 10.0);
    let combo = recipe("Combo", 1, 10.0);
    seed(
        &store,
        &[&rice],
        &[&roll, &combo],
        vec![
            ingredient_link(roll.id, rice.id, 2.0),
            sub_recipe_link(combo.id, roll.id, 2.0),
        ],
    )
    .await;

    let resolver = create_resolver(
        &store,
        ResolverConfig {
            sub_recipe_pricing: SubRecipePricing::Excluded,
            ..ResolverConfig::default()
        },
    );
    let priced = resolver.price(combo).await;

    assert_close(priced.lines[0].unit_cost, 0.25);
    assert_close(priced.lines[0].total_cost, 0.5);
    assert_close(priced.breakdown.total_cost, 0.55);
}

#[tokio::test]
async fn test_duplicate_links_merge_before_costing() {
    let store = InMemoryRecordStore::new();
    let salmon = ingredient("Salmon", 2.0);
    let nigiri = recipe("Nigiri", 1, 0.0);
    let first = ingredient_link(nigiri.id, salmon.id, 1.0);
    let second = ingredient_link(nigiri.id, salmon.id, 3.0);
    let link_ids: Vec<LinkId> = vec![first.id, second.id];
    seed(&store, &[&salmon], &[&nigiri], vec![first, second]).await;

    let priced = default_resolver(&store).price(nigiri).await;

    assert_eq!(priced.lines.len(), 1);
    let line = &priced.lines[0];
    assert_close(line.quantity, 4.0);
    assert_close(line.total_cost, 8.0);
    assert_eq!(line.link_ids, link_ids);
    assert_eq!(priced.diagnostics.merged_links, 1);
}

#[tokio::test]
async fn test_duplicate_links_with_conflicting_units_are_reported() {
    let store = InMemoryRecordStore::new();
    let salmon = ingredient("Salmon", 2.0);
    let nigiri = recipe("Nigiri", 1, 0.0);
    let first = ingredient_link(nigiri.id, salmon.id, 1.0);
    let mut second = ingredient_link(nigiri.id, salmon.id, 1.0);
    second.unit = "lb".to_owned();
    seed(&store, &[&salmon], &[&nigiri], vec![first, second]).await;

    let priced = default_resolver(&store).price(nigiri).await;

    assert_eq!(priced.lines.len(), 1);
    assert_eq!(priced.lines[0].unit, "oz");
    assert_eq!(priced.diagnostics.unit_conflicts.len(), 1);
    assert_eq!(priced.diagnostics.unit_conflicts[0].dropped_unit, "lb");
}

#[tokio::test]
async fn test_cycle_terminates_and_reports_depth_guard() {
    let store = InMemoryRecordStore::new();
    let nori = ingredient("Nori", 0.25);
    let a = recipe("A", 1, 0.0);
    let b = recipe("B", 1, 0.0);
    let c = recipe("C", 1, 0.0);
    seed(
        &store,
        &[&nori],
        &[&a, &b, &c],
        vec![
            ingredient_link(a.id, nori.id, 1.0),
            sub_recipe_link(a.id, b.id, 1.0),
            sub_recipe_link(b.id, c.id, 1.0),
            sub_recipe_link(c.id, a.id, 1.0),
        ],
    )
    .await;

    let resolver = create_resolver(
        &store,
        ResolverConfig {
            max_depth: 3,
            ..ResolverConfig::default()
        },
    );
    let priced = resolver.price(a.clone()).await;

    assert_eq!(priced.diagnostics.depth_limit_hits, 1);
    assert_eq!(
        priced.diagnostics.cycles,
        vec![DetectedCycle {
            path: vec![a.id, b.id, c.id]
        }]
    );
    let sub_line = priced
        .lines
        .iter()
        .find(|line| line.is_sub_recipe())
        .unwrap();
    assert_eq!(sub_line.status, LineStatus::Truncated);
    // Nori at depth 0, and again when A re-enters at depth 3
    assert_close(priced.breakdown.total_cost, 0.5);
}

#[tokio::test]
async fn test_self_reference_terminates() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 1.0);
    let base = recipe("Base", 1, 0.0);
    seed(
        &store,
        &[&rice],
        &[&base],
        vec![
            ingredient_link(base.id, rice.id, 1.0),
            sub_recipe_link(base.id, base.id, 1.0),
        ],
    )
    .await;

    let priced = default_resolver(&store).price(base.clone()).await;

    assert_eq!(priced.diagnostics.depth_limit_hits, 1);
    assert_eq!(
        priced.diagnostics.cycles,
        vec![DetectedCycle {
            path: vec![base.id]
        }]
    );
    // One rice per expanded level, depths 0 through 3
    assert_close(priced.breakdown.total_cost, 4.0);
}

#[tokio::test]
async fn test_deep_chain_truncated_at_max_depth() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 1.0);
    let levels: Vec<Recipe> = (0..6).map(|i| recipe(&format!("L{i}"), 1, 0.0)).collect();
    let mut links: Vec<Link> = levels
        .windows(2)
        .map(|pair| sub_recipe_link(pair[0].id, pair[1].id, 1.0))
        .collect();
    for level in &levels {
        links.push(ingredient_link(level.id, rice.id, 1.0));
    }
    let refs: Vec<&Recipe> = levels.iter().collect();
    seed(&store, &[&rice], &refs, links).await;

    let resolver = create_resolver(
        &store,
        ResolverConfig {
            max_depth: 2,
            ..ResolverConfig::default()
        },
    );
    let priced = resolver.price(levels[0].clone()).await;

    // L0, L1, and L2 are expanded; L3 is cut off
    assert_close(priced.breakdown.total_cost, 3.0);
    assert_eq!(priced.diagnostics.depth_limit_hits, 1);
    assert!(priced.diagnostics.cycles.is_empty());
    let sub_line = priced.lines.iter().find(|l| l.is_sub_recipe()).unwrap();
    assert_eq!(sub_line.status, LineStatus::Truncated);
}

#[tokio::test]
async fn test_recipe_without_links_costs_zero() {
    let store = InMemoryRecordStore::new();
    let empty = recipe("Empty", 2, 10.0);
    seed(&store, &[], &[&empty], Vec::new()).await;

    let priced = default_resolver(&store).price(empty).await;

    assert!(priced.lines.is_empty());
    assert_close(priced.breakdown.base_cost, 0.0);
    assert_close(priced.breakdown.total_cost, 0.0);
    assert_close(priced.breakdown.cost_per_serving, 0.0);
}

#[tokio::test]
async fn test_malformed_links_are_skipped() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 0.5);
    let roll = recipe("Roll", 1, 0.0);
    let mut neither = ingredient_link(roll.id, rice.id, 1.0);
    neither.ingredient_id = None;
    let mut both = ingredient_link(roll.id, rice.id, 1.0);
    both.child_recipe_id = Some(RecipeId::new());
    seed(
        &store,
        &[&rice],
        &[&roll],
        vec![neither, both, ingredient_link(roll.id, rice.id, 2.0)],
    )
    .await;

    let priced = default_resolver(&store).price(roll).await;

    assert_eq!(priced.lines.len(), 1);
    assert_close(priced.breakdown.total_cost, 1.0);
    assert_eq!(priced.diagnostics.malformed_links, 2);
}

#[tokio::test]
async fn test_missing_ingredient_costs_zero() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 0.5);
    let ghost = ingredient("Ghost", 9.0);
    let roll = recipe("Roll", 1, 0.0);
    seed(
        &store,
        &[&rice],
        &[&roll],
        vec![
            ingredient_link(roll.id, rice.id, 2.0),
            ingredient_link(roll.id, ghost.id, 1.0),
        ],
    )
    .await;

    let priced = default_resolver(&store).price(roll).await;

    assert_eq!(priced.lines.len(), 2);
    let missing = &priced.lines[1];
    assert_eq!(missing.status, LineStatus::Unresolved);
    assert_close(missing.total_cost, 0.0);
    assert_close(priced.breakdown.total_cost, 1.0);
    assert_eq!(priced.diagnostics.missing_ingredients, 1);
}

#[tokio::test]
async fn test_missing_sub_recipe_costs_zero() {
    let store = InMemoryRecordStore::new();
    let combo = recipe("Combo", 1, 0.0);
    let deleted = RecipeId::new();
    seed(
        &store,
        &[],
        &[&combo],
        vec![sub_recipe_link(combo.id, deleted, 2.0)],
    )
    .await;

    let priced = default_resolver(&store).price(combo).await;

    assert_eq!(priced.lines.len(), 1);
    assert_eq!(priced.lines[0].status, LineStatus::Unresolved);
    assert_close(priced.lines[0].total_cost, 0.0);
    assert_eq!(priced.diagnostics.unresolved_sub_recipes, vec![deleted]);
}

#[tokio::test]
async fn test_non_positive_servings_price_as_one() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 0.5);
    let roll = recipe("Roll", 0, 0.0);
    seed(
        &store,
        &[&rice],
        &[&roll],
        vec![ingredient_link(roll.id, rice.id, 2.0)],
    )
    .await;

    let priced = default_resolver(&store).price(roll).await;

    assert_close(priced.breakdown.cost_per_serving, 1.0);
}

#[tokio::test]
async fn test_resolve_by_id_returns_lines_and_diagnostics() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 0.5);
    let roll = recipe("Roll", 4, 10.0);
    seed(
        &store,
        &[&rice],
        &[&roll],
        vec![ingredient_link(roll.id, rice.id, 2.0)],
    )
    .await;

    let resolution = default_resolver(&store).resolve(roll.id).await;

    assert_eq!(resolution.lines.len(), 1);
    assert!(resolution.diagnostics.is_clean());
}

#[tokio::test]
async fn test_batch_keeps_diagnostics_per_recipe() {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 0.5);
    let clean = recipe("Clean", 1, 0.0);
    let broken = recipe("Broken", 1, 0.0);
    seed(
        &store,
        &[&rice],
        &[&clean, &broken],
        vec![
            ingredient_link(clean.id, rice.id, 1.0),
            sub_recipe_link(broken.id, RecipeId::new(), 1.0),
        ],
    )
    .await;

    let priced = default_resolver(&store)
        .price_many(vec![clean.clone(), broken.clone()])
        .await;

    assert_eq!(priced.len(), 2);
    assert_eq!(priced[0].recipe.id, clean.id);
    assert!(priced[0].diagnostics.is_clean());
    assert_eq!(priced[1].diagnostics.unresolved_sub_recipes.len(), 1);
}

#[tokio::test]
async fn test_resolver_accepts_injected_lookup() {
    let salmon = ingredient("Salmon", 3.0);
    let sashimi = recipe("Sashimi", 2, 0.0);
    let snapshot = RecordSnapshot::new(
        vec![salmon.clone()],
        vec![ingredient_link(sashimi.id, salmon.id, 2.0)],
    );
    let lookup = StaticLookup {
        snapshot: Arc::new(snapshot),
        recipes: HashMap::from([(sashimi.id, sashimi.clone())]),
    };

    let resolver = CostResolver::new(Arc::new(lookup), ResolverConfig::default());
    let priced = resolver.price(sashimi).await;

    assert_close(priced.breakdown.total_cost, 6.0);
    assert_close(priced.breakdown.cost_per_serving, 3.0);
}
