// ABOUTME: Derived, non-persisted costing views produced by recipe resolution
// ABOUTME: Costed lines, Q-Factor cost breakdowns, priced recipes, and resolution diagnostics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use super::ids::{IngredientId, LinkId, RecipeId};
use super::recipe::Recipe;
use serde::{Deserialize, Serialize};

/// What a costed line was priced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineKind {
    /// Ingredient priced at quantity times unit cost
    Ingredient {
        /// Referenced ingredient
        ingredient_id: IngredientId,
    },
    /// Sub-recipe priced by servings consumed
    SubRecipe {
        /// Referenced child recipe
        recipe_id: RecipeId,
        /// Recursion depth at which the child was resolved
        depth: u32,
    },
}

/// Whether a line's cost could be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    /// Fully priced
    #[default]
    Resolved,
    /// Referenced record missing or unreachable; costed at zero
    Unresolved,
    /// Sub-recipe cut off by the depth guard; costed from an empty child
    Truncated,
}

/// An ingredient or sub-recipe usage annotated with its computed cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostedLine {
    /// Ingredient name, or prefixed sub-recipe name
    pub name: String,
    /// Ingredient or sub-recipe reference
    #[serde(flatten)]
    pub kind: LineKind,
    /// Quantity used (servings for sub-recipes)
    pub quantity: f64,
    /// Unit of measure of the first merged link
    pub unit: String,
    /// Cost per unit (per serving for sub-recipes)
    pub unit_cost: f64,
    /// Cost of this line
    pub total_cost: f64,
    /// Resolution status
    #[serde(default)]
    pub status: LineStatus,
    /// Links merged into this line
    #[serde(default)]
    pub link_ids: Vec<LinkId>,
}

impl CostedLine {
    /// Whether this line prices a sub-recipe
    #[must_use]
    pub const fn is_sub_recipe(&self) -> bool {
        matches!(self.kind, LineKind::SubRecipe { .. })
    }
}

/// Q-Factor pricing of a recipe's raw ingredient-cost sum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CostBreakdown {
    /// Sum of every line's total cost
    pub base_cost: f64,
    /// Q-Factor percentage applied
    pub q_factor_percent: f64,
    /// Surcharge added by the Q-Factor
    pub q_factor_amount: f64,
    /// Base cost plus surcharge
    pub total_cost: f64,
    /// Total cost divided by clamped servings
    pub cost_per_serving: f64,
}

/// A merge of duplicate links whose units disagreed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConflict {
    /// Recipe owning the links
    pub parent_recipe_id: RecipeId,
    /// Unit kept on the merged line
    pub kept_unit: String,
    /// Unit of the link folded into it
    pub dropped_unit: String,
}

/// A recipe re-entered while already on the resolution path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedCycle {
    /// Recipe path from the nearest earlier occurrence of the re-entered recipe
    pub path: Vec<RecipeId>,
}

/// Soft failures absorbed while resolving a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResolutionDiagnostics {
    /// Calls cut off by the depth guard
    pub depth_limit_hits: u32,
    /// Links with neither or both references, skipped
    pub malformed_links: u32,
    /// Ingredient links whose ingredient no longer exists
    pub missing_ingredients: u32,
    /// Sub-recipes that could not be looked up
    pub unresolved_sub_recipes: Vec<RecipeId>,
    /// Duplicate links folded into an earlier one
    pub merged_links: u32,
    /// Merges that had to drop a differing unit
    pub unit_conflicts: Vec<UnitConflict>,
    /// Recipe cycles observed on the resolution path
    pub cycles: Vec<DetectedCycle>,
}

impl ResolutionDiagnostics {
    /// Whether resolution completed without any soft failure
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.depth_limit_hits == 0
            && self.malformed_links == 0
            && self.missing_ingredients == 0
            && self.unresolved_sub_recipes.is_empty()
            && self.unit_conflicts.is_empty()
            && self.cycles.is_empty()
    }
}

/// A recipe with freshly computed costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedRecipe {
    /// The stored recipe
    pub recipe: Recipe,
    /// Costed lines after deduplication and sub-recipe expansion
    pub lines: Vec<CostedLine>,
    /// Q-Factor pricing
    pub breakdown: CostBreakdown,
    /// Soft failures absorbed during resolution
    pub diagnostics: ResolutionDiagnostics,
}
