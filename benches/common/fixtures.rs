// ABOUTME: Generated recipe graphs for resolver benchmarks
// ABOUTME: Layered sub-recipe trees over a shared ingredient pool with duplicate links
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use recipe_core::models::{
    Ingredient, IngredientId, IngredientOrigin, Link, LinkId, Recipe, RecipeCategory, RecipeId,
};
use recipe_cost_server::storage::memory::InMemoryRecordStore;
use recipe_cost_server::storage::RecordStore;

/// Recipe graph sizes
#[derive(Debug, Clone, Copy)]
pub enum GraphSize {
    Small,
    Medium,
    Large,
}

impl GraphSize {
    /// Recipes per layer
    pub const fn width(self) -> usize {
        match self {
            Self::Small => 5,
            Self::Medium => 25,
            Self::Large => 100,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Small => "5_per_layer",
            Self::Medium => "25_per_layer",
            Self::Large => "100_per_layer",
        }
    }
}

fn recipe(name: String) -> Recipe {
    Recipe {
        id: RecipeId::new(),
        name,
        category: RecipeCategory::Other,
        servings: 4,
        q_factor_percent: 10.0,
        prep_time_minutes: 0,
        instructions: Vec::new(),
        notes: None,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn link(parent: RecipeId, ingredient: Option<IngredientId>, child: Option<RecipeId>) -> Link {
    Link {
        id: LinkId::new(),
        parent_recipe_id: parent,
        ingredient_id: ingredient,
        child_recipe_id: child,
        quantity: 1.5,
        unit: "oz".to_owned(),
        note: None,
    }
}

/// Build a four-layer graph; returns the store and the top-layer recipe ids
///
/// Every recipe uses three ingredients (one of them twice, to exercise
/// deduplication) and two recipes from the layer below.
pub async fn layered_graph(size: GraphSize) -> (InMemoryRecordStore, Vec<RecipeId>) {
    let store = InMemoryRecordStore::new();
    let width = size.width();

    let mut ingredients = Vec::with_capacity(width);
    for index in 0..width {
        let ingredient = Ingredient {
            id: IngredientId::new(),
            name: format!("ingredient-{index}"),
            unit: "oz".to_owned(),
            unit_cost: 0.25 + (index % 7) as f64 * 0.1,
            origin: IngredientOrigin::Manual,
            external_product_name: None,
            updated_at: Utc::now(),
        };
        store.create_ingredient(&ingredient).await.unwrap();
        ingredients.push(ingredient.id);
    }

    let mut below: Vec<RecipeId> = Vec::new();
    for layer in 0..4 {
        let mut current = Vec::with_capacity(width);
        for index in 0..width {
            let recipe = recipe(format!("layer-{layer}-recipe-{index}"));
            store.create_recipe(&recipe).await.unwrap();
            for offset in [0, 1, 2, 0] {
                let ingredient = ingredients[(index + offset) % width];
                store
                    .insert_raw_link(link(recipe.id, Some(ingredient), None))
                    .await;
            }
            for offset in 0..2.min(below.len()) {
                let child = below[(index + offset) % below.len()];
                store.insert_raw_link(link(recipe.id, None, Some(child))).await;
            }
            current.push(recipe.id);
        }
        below = current;
    }

    (store, below)
}
