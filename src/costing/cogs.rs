// ABOUTME: Cost-of-goods-sold report matching POS sale lines to priced recipes
// ABOUTME: Validates the sales window, aggregates per recipe, and lists unmatched items
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use chrono::{DateTime, Duration, Utc};
use recipe_core::constants::costing::MAX_SALES_WINDOW_SECS;
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{PricedRecipe, Recipe, RecipeId};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::warn;

/// One POS sale line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Display name of the sold item
    pub item_name: String,
    /// Units sold
    pub quantity: f64,
    /// Price per unit sold
    pub price: f64,
}

/// Sales reported by the POS for one window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CogsRequest {
    /// Window start (inclusive)
    pub window_start: DateTime<Utc>,
    /// Window end (exclusive)
    pub window_end: DateTime<Utc>,
    /// Sale lines in the window
    #[serde(default)]
    pub sales: Vec<SaleLine>,
}

impl CogsRequest {
    /// Check the window bounds and sale quantities
    ///
    /// # Errors
    ///
    /// Returns an error if the window is empty, longer than one hour, or a
    /// sale line has a negative quantity or price
    pub fn validate(&self) -> AppResult<()> {
        let span = self.window_end - self.window_start;
        if span <= Duration::zero() {
            return Err(AppError::value_out_of_range(
                "window_end",
                "must be after window_start",
            ));
        }
        if span > Duration::seconds(MAX_SALES_WINDOW_SECS) {
            return Err(AppError::value_out_of_range(
                "window_end",
                format!("must be at most {MAX_SALES_WINDOW_SECS} seconds after window_start"),
            ));
        }
        for sale in &self.sales {
            if sale.quantity < 0.0 {
                return Err(AppError::value_out_of_range("quantity", "must not be negative"));
            }
            if sale.price < 0.0 {
                return Err(AppError::value_out_of_range("price", "must not be negative"));
            }
        }
        Ok(())
    }
}

/// Realized cost and margin for one recipe sold in the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CogsItem {
    /// Matched recipe
    pub recipe_id: RecipeId,
    /// Recipe name
    pub name: String,
    /// Units sold across all matching sale lines
    pub quantity_sold: f64,
    /// Recipe cost per serving at report time
    pub cost_per_serving: f64,
    /// `quantity_sold * cost_per_serving`
    pub realized_cost: f64,
    /// Sum of quantity times price
    pub revenue: f64,
    /// Revenue minus realized cost
    pub margin: f64,
}

/// Cost-of-goods-sold for one sales window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CogsReport {
    /// Window start
    pub window_start: DateTime<Utc>,
    /// Window end
    pub window_end: DateTime<Utc>,
    /// One entry per matched recipe, in first-sale order
    pub items: Vec<CogsItem>,
    /// Sold item names with no recipe, or more than one recipe, of that name
    pub unmatched_items: Vec<String>,
    /// Sum of realized cost
    pub total_cost: f64,
    /// Sum of revenue
    pub total_revenue: f64,
    /// Total revenue minus total cost
    pub total_margin: f64,
}

/// Sale lines grouped by the recipe they matched
#[derive(Debug, Default)]
pub struct SalesMatch {
    /// Matched recipes with (quantity, revenue), in first-sale order
    pub matched: Vec<(RecipeId, f64, f64)>,
    /// Unmatched or ambiguous item names, first occurrence only
    pub unmatched: Vec<String>,
}

impl SalesMatch {
    /// Recipes that need pricing
    #[must_use]
    pub fn recipe_ids(&self) -> Vec<RecipeId> {
        self.matched.iter().map(|&(id, _, _)| id).collect()
    }
}

/// Recipe name index where a name shared by several recipes maps to `None`
fn index_by_name(recipes: &[Recipe]) -> HashMap<String, Option<RecipeId>> {
    let mut by_name = HashMap::new();
    for recipe in recipes {
        match by_name.entry(recipe.name.trim().to_lowercase()) {
            Entry::Vacant(slot) => {
                slot.insert(Some(recipe.id));
            }
            Entry::Occupied(mut slot) => {
                warn!(
                    name = %recipe.name,
                    "Recipe name is not unique; sales under it stay unmatched"
                );
                slot.insert(None);
            }
        }
    }
    by_name
}

/// Match sale item names to recipe names, case-insensitively
///
/// A name shared by more than one recipe cannot be attributed and is
/// reported as unmatched.
#[must_use]
pub fn match_sales(sales: &[SaleLine], recipes: &[Recipe]) -> SalesMatch {
    let by_name = index_by_name(recipes);

    let mut result = SalesMatch::default();
    let mut positions: HashMap<RecipeId, usize> = HashMap::new();
    for sale in sales {
        let Some(&Some(recipe_id)) = by_name.get(&sale.item_name.trim().to_lowercase()) else {
            if !result.unmatched.contains(&sale.item_name) {
                result.unmatched.push(sale.item_name.clone());
            }
            continue;
        };
        let revenue = sale.quantity * sale.price;
        if let Some(&position) = positions.get(&recipe_id) {
            let entry = &mut result.matched[position];
            entry.1 += sale.quantity;
            entry.2 += revenue;
        } else {
            positions.insert(recipe_id, result.matched.len());
            result.matched.push((recipe_id, sale.quantity, revenue));
        }
    }
    result
}

/// Assemble the report from matched sales and their priced recipes
#[must_use]
pub fn build_report(request: &CogsRequest, sales: SalesMatch, priced: &[PricedRecipe]) -> CogsReport {
    let priced_by_id: HashMap<RecipeId, &PricedRecipe> =
        priced.iter().map(|priced| (priced.recipe.id, priced)).collect();

    let items: Vec<CogsItem> = sales
        .matched
        .iter()
        .filter_map(|&(recipe_id, quantity_sold, revenue)| {
            let priced = priced_by_id.get(&recipe_id)?;
            let cost_per_serving = priced.breakdown.cost_per_serving;
            let realized_cost = quantity_sold * cost_per_serving;
            Some(CogsItem {
                recipe_id,
                name: priced.recipe.name.clone(),
                quantity_sold,
                cost_per_serving,
                realized_cost,
                revenue,
                margin: revenue - realized_cost,
            })
        })
        .collect();

    let total_cost: f64 = items.iter().map(|item| item.realized_cost).sum();
    let total_revenue: f64 = items.iter().map(|item| item.revenue).sum();

    CogsReport {
        window_start: request.window_start,
        window_end: request.window_end,
        items,
        unmatched_items: sales.unmatched,
        total_cost,
        total_revenue,
        total_margin: total_revenue - total_cost,
    }
}
