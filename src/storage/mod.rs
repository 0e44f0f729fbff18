// ABOUTME: Record-storage backend abstraction for ingredients, recipes, and links
// ABOUTME: Bulk list operations plus single-record writes; link filtering happens client-side
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! # Record Storage
//!
//! The record-storage backend is an external collaborator. The costing engine
//! only ever asks it for whole collections ("list all links") and never for
//! field-filtered subsets: equality filters on linked-record fields are not
//! trusted, so every lookup by parent recipe is done in memory after a bulk
//! fetch.

/// Backend selection from a connection string
pub mod factory;
/// In-process backend used for tests and ephemeral deployments
pub mod memory;
/// `SQLite` backend built on sqlx
pub mod sqlite;

use async_trait::async_trait;
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{Ingredient, IngredientId, Link, LinkId, Recipe, RecipeId};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout as with_timeout;

/// How [`RecordStore::save_recipe`] treats the recipe row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeWrite {
    /// Insert a new recipe; already-exists when the id is taken
    Create,
    /// Overwrite an existing recipe; not-found when absent
    Update,
}

/// Core record-storage abstraction
///
/// All backends implement this trait so the cache, resolver, and service
/// never depend on a concrete store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable backend description for logs
    fn backend_info(&self) -> &'static str;

    /// Verify the backend is reachable
    async fn health_check(&self) -> AppResult<()>;

    // ================================
    // Ingredients
    // ================================

    /// Fetch the full ingredient collection
    async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>>;

    /// Fetch one ingredient
    async fn get_ingredient(&self, id: IngredientId) -> AppResult<Option<Ingredient>>;

    /// Insert a new ingredient
    async fn create_ingredient(&self, ingredient: &Ingredient) -> AppResult<()>;

    /// Overwrite an existing ingredient; not-found when absent
    async fn update_ingredient(&self, ingredient: &Ingredient) -> AppResult<()>;

    /// Remove an ingredient, returning whether it existed
    async fn delete_ingredient(&self, id: IngredientId) -> AppResult<bool>;

    // ================================
    // Recipes
    // ================================

    /// Fetch the full recipe collection
    async fn list_recipes(&self) -> AppResult<Vec<Recipe>>;

    /// Fetch one recipe
    async fn get_recipe(&self, id: RecipeId) -> AppResult<Option<Recipe>>;

    /// Insert a new recipe
    async fn create_recipe(&self, recipe: &Recipe) -> AppResult<()>;

    /// Write a recipe and, when `links` is supplied, replace every link it owns
    ///
    /// The recipe row and its links are written as one unit: when any part
    /// fails, nothing is persisted.
    async fn save_recipe(
        &self,
        recipe: &Recipe,
        links: Option<&[Link]>,
        write: RecipeWrite,
    ) -> AppResult<()>;

    /// Remove a recipe and the links it owns, returning whether it existed
    async fn delete_recipe(&self, id: RecipeId) -> AppResult<bool>;

    // ================================
    // Links
    // ================================

    /// Fetch the full link collection in insertion order
    async fn list_links(&self) -> AppResult<Vec<Link>>;

    /// Fetch one link
    async fn get_link(&self, id: LinkId) -> AppResult<Option<Link>>;

    /// Insert a new link
    async fn create_link(&self, link: &Link) -> AppResult<()>;

    /// Overwrite an existing link; not-found when absent
    async fn update_link(&self, link: &Link) -> AppResult<()>;

    /// Remove a link, returning whether it existed
    async fn delete_link(&self, id: LinkId) -> AppResult<bool>;
}

/// Run a backend call with an upper bound on its duration
///
/// # Errors
///
/// Returns the call's own error, or a backend-unavailable error on timeout
pub async fn bounded<T, F>(timeout: Duration, operation: &str, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>> + Send,
{
    with_timeout(timeout, call).await.map_err(|_| {
        AppError::backend_unavailable(format!(
            "{operation} timed out after {}ms",
            timeout.as_millis()
        ))
    })?
}
