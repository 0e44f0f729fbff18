// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides record fixtures, store seeding, and server resource builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `recipe_cost_server`
//!
//! Builders for ingredients, recipes, and links plus helpers that seed an
//! in-memory store and wire the cache, resolver, and service over it.

use chrono::Utc;
use recipe_core::models::{
    Ingredient, IngredientId, IngredientOrigin, Link, LinkId, Recipe, RecipeCategory, RecipeId,
};
use recipe_cost_server::{
    cache::{RecordCache, RecordCacheConfig, RecordLookup},
    config::ServerConfig,
    costing::{CostResolver, ResolverConfig},
    resources::ServerResources,
    storage::{memory::InMemoryRecordStore, RecordStore},
};
use std::env;
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Floating point comparison for derived costs
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub fn ingredient(name: &str, unit_cost: f64) -> Ingredient {
    Ingredient {
        id: IngredientId::new(),
        name: name.to_owned(),
        unit: "oz".to_owned(),
        unit_cost,
        origin: IngredientOrigin::Manual,
        external_product_name: None,
        updated_at: Utc::now(),
    }
}

pub fn recipe(name: &str, servings: i32, q_factor_percent: f64) -> Recipe {
    let now = Utc::now();
    Recipe {
        id: RecipeId::new(),
        name: name.to_owned(),
        category: RecipeCategory::Roll,
        servings,
        q_factor_percent,
        prep_time_minutes: 0,
        instructions: Vec::new(),
        notes: None,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn ingredient_link(parent: RecipeId, ingredient: IngredientId, quantity: f64) -> Link {
    Link {
        id: LinkId::new(),
        parent_recipe_id: parent,
        ingredient_id: Some(ingredient),
        child_recipe_id: None,
        quantity,
        unit: "oz".to_owned(),
        note: None,
    }
}

pub fn sub_recipe_link(parent: RecipeId, child: RecipeId, servings: f64) -> Link {
    Link {
        id: LinkId::new(),
        parent_recipe_id: parent,
        ingredient_id: None,
        child_recipe_id: Some(child),
        quantity: servings,
        unit: "serving".to_owned(),
        note: None,
    }
}

/// Store records directly, bypassing write-boundary validation
pub async fn seed(
    store: &InMemoryRecordStore,
    ingredients: &[&Ingredient],
    recipes: &[&Recipe],
    links: Vec<Link>,
) {
    for ingredient in ingredients {
        store.create_ingredient(ingredient).await.unwrap();
    }
    for recipe in recipes {
        store.create_recipe(recipe).await.unwrap();
    }
    for link in links {
        store.insert_raw_link(link).await;
    }
}

/// Cache settings with a long TTL so tests never expire by accident
pub fn test_cache_config() -> RecordCacheConfig {
    RecordCacheConfig {
        ttl: Duration::from_secs(300),
        backend_timeout: Duration::from_secs(5),
    }
}

pub fn create_cache(store: Arc<dyn RecordStore>) -> Arc<RecordCache> {
    init_test_logging();
    Arc::new(RecordCache::new(store, test_cache_config()))
}

pub fn create_resolver(store: &InMemoryRecordStore, config: ResolverConfig) -> CostResolver {
    let cache = create_cache(Arc::new(store.clone()));
    let lookup: Arc<dyn RecordLookup> = cache;
    CostResolver::new(lookup, config)
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        database_url: "memory://".to_owned(),
        cache: test_cache_config(),
        ..ServerConfig::default()
    }
}

/// Server resources over an in-memory store
pub fn create_test_resources(store: &InMemoryRecordStore) -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(
        test_server_config(),
        Arc::new(store.clone()),
    ))
}
