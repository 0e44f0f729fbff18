// ABOUTME: Recursive, depth-bounded cost resolver over the Record Cache
// ABOUTME: Costs ingredient lines, expands sub-recipes per serving, and records soft failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! # Cost Resolver
//!
//! Walks the recipe graph from one recipe: filter its links from the cached
//! snapshot, merge duplicates, cost ingredient lines directly, and resolve
//! each sub-recipe one level deeper to price it per serving consumed.
//!
//! Recursion stops when `depth > max_depth`, which bounds every walk,
//! cyclic graphs included. Re-entering a recipe already on the path is also
//! recorded as a [`DetectedCycle`] so the truncation is explainable.
//!
//! Nothing here fails hard. Missing ingredients, missing sub-recipes,
//! malformed links, and backend errors become zero-cost lines and
//! [`ResolutionDiagnostics`] entries.

use super::dedupe::dedupe_links;
use super::qfactor::{effective_servings, price_recipe};
use crate::cache::{RecordLookup, RecordSnapshot};
use futures_util::future::BoxFuture;
use recipe_core::constants::costing::{DEFAULT_MAX_DEPTH, SUB_RECIPE_PREFIX};
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{
    CostedLine, DetectedCycle, IngredientId, LineKind, LineStatus, Link, LinkTarget, PricedRecipe,
    Recipe, RecipeId, ResolutionDiagnostics,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::mem;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a consumed sub-recipe is priced per serving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubRecipePricing {
    /// Child cost per serving includes the child's own Q-Factor
    #[default]
    Included,
    /// Child base cost per serving; only the consuming recipe's Q-Factor applies
    Excluded,
}

impl SubRecipePricing {
    /// Configuration string form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Included => "included",
            Self::Excluded => "excluded",
        }
    }

    /// Parse the configuration string form
    ///
    /// # Errors
    ///
    /// Returns an error for anything other than `included` or `excluded`
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "included" => Ok(Self::Included),
            "excluded" => Ok(Self::Excluded),
            other => Err(AppError::config(format!(
                "Invalid sub-recipe Q-Factor mode '{other}', expected 'included' or 'excluded'"
            ))),
        }
    }
}

/// Resolver tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Deepest sub-recipe level that is still expanded
    pub max_depth: u32,
    /// Sub-recipe per-serving pricing mode
    pub sub_recipe_pricing: SubRecipePricing,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            sub_recipe_pricing: SubRecipePricing::default(),
        }
    }
}

/// Costed lines for one recipe with the soft failures met on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Costed lines after deduplication and sub-recipe expansion
    pub lines: Vec<CostedLine>,
    /// Soft failures absorbed during resolution
    pub diagnostics: ResolutionDiagnostics,
}

/// State threaded through one (possibly batched) resolution
struct ResolutionState {
    snapshot: Arc<RecordSnapshot>,
    recipes: HashMap<RecipeId, Option<Recipe>>,
    path: Vec<RecipeId>,
    diagnostics: ResolutionDiagnostics,
}

impl ResolutionState {
    fn new(snapshot: Arc<RecordSnapshot>) -> Self {
        Self {
            snapshot,
            recipes: HashMap::new(),
            path: Vec::new(),
            diagnostics: ResolutionDiagnostics::default(),
        }
    }

    fn take_diagnostics(&mut self) -> ResolutionDiagnostics {
        mem::take(&mut self.diagnostics)
    }
}

/// Cost resolver with an injected record lookup
#[derive(Clone)]
pub struct CostResolver {
    lookup: Arc<dyn RecordLookup>,
    config: ResolverConfig,
}

impl CostResolver {
    /// Create a resolver reading through `lookup`
    #[must_use]
    pub fn new(lookup: Arc<dyn RecordLookup>, config: ResolverConfig) -> Self {
        Self { lookup, config }
    }

    /// Resolver tuning
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the costed lines of one recipe
    pub async fn resolve(&self, recipe_id: RecipeId) -> Resolution {
        let mut state = ResolutionState::new(self.lookup.snapshot().await);
        let lines = self.resolve_at(&mut state, recipe_id, 0).await;
        Resolution {
            lines,
            diagnostics: state.take_diagnostics(),
        }
    }

    /// Resolve and price one recipe
    pub async fn price(&self, recipe: Recipe) -> PricedRecipe {
        let mut state = ResolutionState::new(self.lookup.snapshot().await);
        self.price_with(&mut state, recipe).await
    }

    /// Resolve and price many recipes against a single snapshot
    ///
    /// Sub-recipe headers looked up for one recipe are reused for the rest.
    pub async fn price_many(&self, recipes: Vec<Recipe>) -> Vec<PricedRecipe> {
        let mut state = ResolutionState::new(self.lookup.snapshot().await);
        let mut priced = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            priced.push(self.price_with(&mut state, recipe).await);
        }
        priced
    }

    async fn price_with(&self, state: &mut ResolutionState, recipe: Recipe) -> PricedRecipe {
        state.recipes.insert(recipe.id, Some(recipe.clone()));
        let lines = self.resolve_at(state, recipe.id, 0).await;
        let breakdown = price_recipe(&lines, recipe.servings, recipe.q_factor_percent);
        PricedRecipe {
            recipe,
            lines,
            breakdown,
            diagnostics: state.take_diagnostics(),
        }
    }

    fn resolve_at<'a>(
        &'a self,
        state: &'a mut ResolutionState,
        recipe_id: RecipeId,
        depth: u32,
    ) -> BoxFuture<'a, Vec<CostedLine>> {
        Box::pin(async move {
            if depth > self.config.max_depth {
                state.diagnostics.depth_limit_hits += 1;
                warn!(
                    recipe_id = %recipe_id,
                    depth,
                    max_depth = self.config.max_depth,
                    "Recursion depth limit reached, sub-recipe truncated"
                );
                return Vec::new();
            }

            record_cycle(state, recipe_id);
            state.path.push(recipe_id);

            let snapshot = Arc::clone(&state.snapshot);
            let (well_formed, malformed): (Vec<&Link>, Vec<&Link>) = snapshot
                .links_for(recipe_id)
                .partition(|link| link.target().is_some());
            if !malformed.is_empty() {
                let count = u32::try_from(malformed.len()).unwrap_or(u32::MAX);
                state.diagnostics.malformed_links += count;
                warn!(recipe_id = %recipe_id, count, "Skipping malformed recipe links");
            }

            let deduped = dedupe_links(well_formed);
            state.diagnostics.merged_links += deduped.merged;
            for conflict in &deduped.unit_conflicts {
                warn!(
                    recipe_id = %recipe_id,
                    kept_unit = %conflict.kept_unit,
                    dropped_unit = %conflict.dropped_unit,
                    "Merged duplicate links with conflicting units"
                );
            }
            state.diagnostics.unit_conflicts.extend(deduped.unit_conflicts);

            let mut lines = Vec::with_capacity(deduped.links.len());
            for merged in deduped.links {
                let line = match merged.link.target() {
                    Some(LinkTarget::Ingredient(ingredient_id)) => {
                        cost_ingredient(state, &snapshot, &merged.link, ingredient_id)
                    }
                    Some(LinkTarget::SubRecipe(child_id)) => {
                        self.cost_sub_recipe(state, &merged.link, child_id, depth + 1)
                            .await
                    }
                    None => continue,
                };
                lines.push(CostedLine {
                    link_ids: merged.source_ids,
                    ..line
                });
            }

            state.path.pop();
            debug!(recipe_id = %recipe_id, depth, lines = lines.len(), "Recipe resolved");
            lines
        })
    }

    async fn cost_sub_recipe(
        &self,
        state: &mut ResolutionState,
        link: &Link,
        child_id: RecipeId,
        child_depth: u32,
    ) -> CostedLine {
        let kind = LineKind::SubRecipe {
            recipe_id: child_id,
            depth: child_depth,
        };

        let Some(child) = self.child_recipe(state, child_id).await else {
            if !state.diagnostics.unresolved_sub_recipes.contains(&child_id) {
                state.diagnostics.unresolved_sub_recipes.push(child_id);
            }
            warn!(
                parent_recipe_id = %link.parent_recipe_id,
                child_recipe_id = %child_id,
                "Sub-recipe could not be resolved, costing line at zero"
            );
            return CostedLine {
                name: format!("{SUB_RECIPE_PREFIX}{child_id}"),
                kind,
                quantity: link.quantity,
                unit: link.unit.clone(),
                unit_cost: 0.0,
                total_cost: 0.0,
                status: LineStatus::Unresolved,
                link_ids: Vec::new(),
            };
        };

        let cut_off = child_depth > self.config.max_depth;
        let child_lines = self.resolve_at(state, child_id, child_depth).await;
        let truncated = cut_off
            || child_lines
                .iter()
                .any(|line| line.status == LineStatus::Truncated);

        let breakdown = price_recipe(&child_lines, child.servings, child.q_factor_percent);
        let unit_cost = match self.config.sub_recipe_pricing {
            SubRecipePricing::Included => breakdown.cost_per_serving,
            SubRecipePricing::Excluded => {
                breakdown.base_cost / effective_servings(child.servings)
            }
        };

        CostedLine {
            name: format!("{SUB_RECIPE_PREFIX}{}", child.name),
            kind,
            quantity: link.quantity,
            unit: link.unit.clone(),
            unit_cost,
            total_cost: unit_cost * link.quantity,
            status: if truncated {
                LineStatus::Truncated
            } else {
                LineStatus::Resolved
            },
            link_ids: Vec::new(),
        }
    }

    async fn child_recipe(&self, state: &mut ResolutionState, id: RecipeId) -> Option<Recipe> {
        if let Some(cached) = state.recipes.get(&id) {
            return cached.clone();
        }
        let found = match self.lookup.recipe(id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(recipe_id = %id, error = %e, "Sub-recipe lookup failed");
                None
            }
        };
        state.recipes.insert(id, found.clone());
        found
    }
}

fn cost_ingredient(
    state: &mut ResolutionState,
    snapshot: &RecordSnapshot,
    link: &Link,
    ingredient_id: IngredientId,
) -> CostedLine {
    let kind = LineKind::Ingredient { ingredient_id };
    if let Some(ingredient) = snapshot.ingredient(ingredient_id) {
        return CostedLine {
            name: ingredient.name.clone(),
            kind,
            quantity: link.quantity,
            unit: link.unit.clone(),
            unit_cost: ingredient.unit_cost,
            total_cost: link.quantity * ingredient.unit_cost,
            status: LineStatus::Resolved,
            link_ids: Vec::new(),
        };
    }

    state.diagnostics.missing_ingredients += 1;
    warn!(
        recipe_id = %link.parent_recipe_id,
        ingredient_id = %ingredient_id,
        "Linked ingredient not found, costing line at zero"
    );
    CostedLine {
        name: format!("Missing ingredient {ingredient_id}"),
        kind,
        quantity: link.quantity,
        unit: link.unit.clone(),
        unit_cost: 0.0,
        total_cost: 0.0,
        status: LineStatus::Unresolved,
        link_ids: Vec::new(),
    }
}

/// Record a cycle when `recipe_id` is already an ancestor on the current path
fn record_cycle(state: &mut ResolutionState, recipe_id: RecipeId) {
    let Some(start) = state.path.iter().rposition(|&id| id == recipe_id) else {
        return;
    };
    let cycle = DetectedCycle {
        path: state.path[start..].to_vec(),
    };
    if !state.diagnostics.cycles.contains(&cycle) {
        warn!(recipe_id = %recipe_id, length = cycle.path.len(), "Recipe cycle detected");
        state.diagnostics.cycles.push(cycle);
    }
}
