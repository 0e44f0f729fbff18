// ABOUTME: Core domain models for recipe cost resolution
// ABOUTME: Re-exports identifiers, records, write requests, and costing views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! Domain models
//!
//! Ingredients, recipes, and links are the persisted records. Costed lines,
//! cost breakdowns, and priced recipes are derived on every read and never
//! stored.

/// Costed lines, breakdowns, and resolution diagnostics
pub mod costing;
/// Strongly typed record identifiers
pub mod ids;
/// Ingredient records and write requests
pub mod ingredient;
/// Recipe-to-ingredient and recipe-to-sub-recipe links
pub mod link;
/// Recipe records and write requests
pub mod recipe;

pub use costing::{
    CostBreakdown, CostedLine, DetectedCycle, LineKind, LineStatus, PricedRecipe,
    ResolutionDiagnostics, UnitConflict,
};
pub use ids::{IngredientId, LinkId, RecipeId};
pub use ingredient::{
    CreateIngredientRequest, Ingredient, IngredientOrigin, UpdateIngredientRequest,
};
pub use link::{CreateLinkRequest, Link, LinkTarget, UpdateLinkRequest};
pub use recipe::{
    CreateRecipeRequest, Recipe, RecipeCategory, RecipeLineInput, RecipeListFilter,
    UpdateRecipeRequest,
};

pub(crate) mod validation;
