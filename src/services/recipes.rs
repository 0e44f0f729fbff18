// ABOUTME: Recipe Service orchestrating store writes, cache invalidation, and cost resolution
// ABOUTME: Priced single and batch reads, unpriced listings, CRUD, ERP pricing, and COGS reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use crate::cache::{CacheStats, RecordCache, RecordLookup};
use crate::costing::cogs::{build_report, match_sales, CogsReport, CogsRequest};
use crate::costing::units::convert_erp_price;
use crate::costing::{CostResolver, ResolverConfig};
use crate::storage::{bounded, RecipeWrite, RecordStore};
use chrono::Utc;
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{
    CreateIngredientRequest, CreateLinkRequest, CreateRecipeRequest, Ingredient, IngredientId,
    IngredientOrigin, Link, LinkId, LinkTarget, PricedRecipe, Recipe, RecipeId, RecipeListFilter,
    UpdateIngredientRequest, UpdateLinkRequest, UpdateRecipeRequest,
};
use std::collections::HashSet;
use std::future::Future;
use std::slice;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Consumer-facing orchestration over the store, cache, and resolver
///
/// Every write goes to the store first and then calls
/// [`RecordCache::invalidate`] before returning, so the caller's next read
/// is computed from fresh data.
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecordStore>,
    cache: Arc<RecordCache>,
    resolver: CostResolver,
    backend_timeout: Duration,
}

impl RecipeService {
    /// Wire the service to a store and the cache built over it
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<RecordCache>,
        resolver_config: ResolverConfig,
    ) -> Self {
        let backend_timeout = cache.config().backend_timeout;
        let lookup: Arc<dyn RecordLookup> = cache.clone();
        Self {
            store,
            cache,
            resolver: CostResolver::new(lookup, resolver_config),
            backend_timeout,
        }
    }

    /// The resolver used for priced reads
    #[must_use]
    pub const fn resolver(&self) -> &CostResolver {
        &self.resolver
    }

    async fn call<T, F>(&self, operation: &str, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>> + Send,
    {
        bounded(self.backend_timeout, operation, call).await
    }

    // ================================
    // Recipe reads
    // ================================

    /// Read one recipe with freshly computed costs
    ///
    /// # Errors
    ///
    /// Returns not-found if the recipe does not exist, or a backend error if
    /// the recipe itself cannot be read. Broken lines never fail the read.
    pub async fn get_priced_recipe(&self, id: RecipeId) -> AppResult<PricedRecipe> {
        let recipe = self.require_recipe(id).await?;
        Ok(self.resolver.price(recipe).await)
    }

    /// Read many recipes priced against one cache snapshot
    ///
    /// Results follow the order of `ids`; repeated ids are priced once.
    ///
    /// # Errors
    ///
    /// Returns not-found naming the first id with no recipe
    pub async fn get_priced_recipes(&self, ids: &[RecipeId]) -> AppResult<Vec<PricedRecipe>> {
        let recipes = self.call("recipe listing", self.store.list_recipes()).await?;
        let mut seen = HashSet::new();
        let mut selected = Vec::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(*id) {
                continue;
            }
            let recipe = recipes
                .iter()
                .find(|recipe| recipe.id == *id)
                .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;
            selected.push(recipe.clone());
        }
        Ok(self.resolver.price_many(selected).await)
    }

    /// List recipes without pricing, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot list recipes
    pub async fn list_recipes(&self, filter: &RecipeListFilter) -> AppResult<Vec<Recipe>> {
        let recipes = self.call("recipe listing", self.store.list_recipes()).await?;
        Ok(recipes
            .into_iter()
            .filter(|recipe| filter.matches(recipe))
            .collect())
    }

    /// Links owned by a recipe, as stored
    ///
    /// # Errors
    ///
    /// Returns not-found if the recipe does not exist
    pub async fn recipe_links(&self, id: RecipeId) -> AppResult<Vec<Link>> {
        self.require_recipe(id).await?;
        let links = self.call("link listing", self.store.list_links()).await?;
        Ok(links
            .into_iter()
            .filter(|link| link.parent_recipe_id == id)
            .collect())
    }

    // ================================
    // Recipe writes
    // ================================

    /// Create a recipe with its lines and return it priced
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the failed constraint, or a backend
    /// error if the write fails
    pub async fn create_recipe(&self, request: CreateRecipeRequest) -> AppResult<PricedRecipe> {
        request.validate()?;
        let (recipe, links) = request.into_records();
        self.ensure_targets_exist(&links).await?;

        self.call(
            "recipe create",
            self.store
                .save_recipe(&recipe, Some(links.as_slice()), RecipeWrite::Create),
        )
        .await?;
        self.cache.invalidate();
        info!(recipe_id = %recipe.id, lines = links.len(), "Recipe created");

        Ok(self.resolver.price(recipe).await)
    }

    /// Update a recipe; supplied lines replace every existing link
    ///
    /// # Errors
    ///
    /// Returns not-found, a validation error, or a backend error
    pub async fn update_recipe(
        &self,
        id: RecipeId,
        request: UpdateRecipeRequest,
    ) -> AppResult<PricedRecipe> {
        request.validate(id)?;
        let mut recipe = self.require_recipe(id).await?;
        let replacement = request.apply_to(&mut recipe);

        let links = replacement.map(|lines| {
            lines
                .into_iter()
                .map(|line| line.into_link(id))
                .collect::<Vec<_>>()
        });
        if let Some(links) = &links {
            self.ensure_targets_exist(links).await?;
        }

        self.call(
            "recipe update",
            self.store
                .save_recipe(&recipe, links.as_deref(), RecipeWrite::Update),
        )
        .await?;
        self.cache.invalidate();
        info!(recipe_id = %id, lines_replaced = links.is_some(), "Recipe updated");

        Ok(self.resolver.price(recipe).await)
    }

    /// Delete a recipe and the links it owns
    ///
    /// Links in other recipes that use it as a sub-recipe are kept and
    /// resolve as unresolved lines.
    ///
    /// # Errors
    ///
    /// Returns not-found if the recipe does not exist
    pub async fn delete_recipe(&self, id: RecipeId) -> AppResult<()> {
        let deleted = self.call("recipe delete", self.store.delete_recipe(id)).await?;
        if !deleted {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }
        self.cache.invalidate();
        info!(recipe_id = %id, "Recipe deleted");
        Ok(())
    }

    // ================================
    // Ingredients
    // ================================

    /// List cached ingredients, optionally filtered by a name search
    ///
    /// Served from the Record Cache, so a backend outage returns the last
    /// good snapshot instead of failing.
    pub async fn list_ingredients(&self, search: Option<&str>) -> Vec<Ingredient> {
        let ingredients = self.cache.get_ingredients().await;
        match search.map(|needle| needle.trim().to_lowercase()) {
            Some(needle) if !needle.is_empty() => ingredients
                .into_iter()
                .filter(|ingredient| ingredient.matches_search(&needle))
                .collect(),
            _ => ingredients,
        }
    }

    /// Read one ingredient from the backend
    ///
    /// # Errors
    ///
    /// Returns not-found if the ingredient does not exist
    pub async fn get_ingredient(&self, id: IngredientId) -> AppResult<Ingredient> {
        self.call("ingredient lookup", self.store.get_ingredient(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {id}")))
    }

    /// Create an ingredient
    ///
    /// # Errors
    ///
    /// Returns a validation error or a backend error
    pub async fn create_ingredient(&self, request: CreateIngredientRequest) -> AppResult<Ingredient> {
        request.validate()?;
        let ingredient = request.into_ingredient();
        self.call("ingredient create", self.store.create_ingredient(&ingredient))
            .await?;
        self.cache.invalidate();
        info!(ingredient_id = %ingredient.id, name = %ingredient.name, "Ingredient created");
        Ok(ingredient)
    }

    /// Update an ingredient
    ///
    /// # Errors
    ///
    /// Returns not-found, a validation error, or a backend error
    pub async fn update_ingredient(
        &self,
        id: IngredientId,
        request: UpdateIngredientRequest,
    ) -> AppResult<Ingredient> {
        request.validate()?;
        let mut ingredient = self.get_ingredient(id).await?;
        request.apply_to(&mut ingredient);
        self.call("ingredient update", self.store.update_ingredient(&ingredient))
            .await?;
        self.cache.invalidate();
        info!(ingredient_id = %id, unit_cost = ingredient.unit_cost, "Ingredient updated");
        Ok(ingredient)
    }

    /// Delete an ingredient; links to it resolve as unresolved lines
    ///
    /// # Errors
    ///
    /// Returns not-found if the ingredient does not exist
    pub async fn delete_ingredient(&self, id: IngredientId) -> AppResult<()> {
        let deleted = self
            .call("ingredient delete", self.store.delete_ingredient(id))
            .await?;
        if !deleted {
            return Err(AppError::not_found(format!("Ingredient {id}")));
        }
        self.cache.invalidate();
        info!(ingredient_id = %id, "Ingredient deleted");
        Ok(())
    }

    /// Overwrite an ingredient's unit cost from an ERP price
    ///
    /// The ERP price per `erp_unit` is converted to the base unit and the
    /// ingredient is marked as ERP-sourced.
    ///
    /// # Errors
    ///
    /// Returns not-found, an error for an unknown unit or negative price, or
    /// a backend error
    pub async fn apply_erp_price(
        &self,
        id: IngredientId,
        price: f64,
        erp_unit: &str,
    ) -> AppResult<Ingredient> {
        let unit_cost = convert_erp_price(price, erp_unit)?;
        let mut ingredient = self.get_ingredient(id).await?;
        ingredient.unit_cost = unit_cost;
        ingredient.origin = IngredientOrigin::Erp;
        ingredient.updated_at = Utc::now();
        self.call("ingredient update", self.store.update_ingredient(&ingredient))
            .await?;
        self.cache.invalidate();
        info!(
            ingredient_id = %id,
            erp_price = price,
            erp_unit,
            unit_cost,
            "Applied ERP price"
        );
        Ok(ingredient)
    }

    // ================================
    // Links
    // ================================

    /// Add one line to an existing recipe
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown parent or target, a validation error,
    /// or a backend error
    pub async fn create_link(&self, request: CreateLinkRequest) -> AppResult<Link> {
        request.validate()?;
        self.require_recipe(request.parent_recipe_id).await?;
        let link = request.into_link();
        self.ensure_targets_exist(slice::from_ref(&link)).await?;
        self.call("link create", self.store.create_link(&link)).await?;
        self.cache.invalidate();
        info!(link_id = %link.id, recipe_id = %link.parent_recipe_id, "Link created");
        Ok(link)
    }

    /// Update a link's quantity, unit, or note
    ///
    /// # Errors
    ///
    /// Returns not-found, a validation error, or a backend error
    pub async fn update_link(&self, id: LinkId, request: UpdateLinkRequest) -> AppResult<Link> {
        request.validate()?;
        let mut link = self
            .call("link lookup", self.store.get_link(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Link {id}")))?;
        request.apply_to(&mut link);
        self.call("link update", self.store.update_link(&link)).await?;
        self.cache.invalidate();
        info!(link_id = %id, "Link updated");
        Ok(link)
    }

    /// Delete a link
    ///
    /// # Errors
    ///
    /// Returns not-found if the link does not exist
    pub async fn delete_link(&self, id: LinkId) -> AppResult<()> {
        let deleted = self.call("link delete", self.store.delete_link(id)).await?;
        if !deleted {
            return Err(AppError::not_found(format!("Link {id}")));
        }
        self.cache.invalidate();
        info!(link_id = %id, "Link deleted");
        Ok(())
    }

    // ================================
    // Cache and reports
    // ================================

    /// Operator-triggered invalidation; returns the counters afterwards
    pub async fn clear_cache(&self) -> CacheStats {
        self.cache.invalidate();
        info!("Record cache cleared by operator");
        self.cache.stats().await
    }

    /// Record Cache counters
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Realized cost of goods sold for a POS sales window
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad window, or a backend error if
    /// recipes cannot be listed
    pub async fn cost_of_goods_sold(&self, request: CogsRequest) -> AppResult<CogsReport> {
        request.validate()?;
        let recipes = self.call("recipe listing", self.store.list_recipes()).await?;
        let sales = match_sales(&request.sales, &recipes);
        if !sales.unmatched.is_empty() {
            warn!(
                unmatched = sales.unmatched.len(),
                "Sold items without a matching recipe"
            );
        }

        let wanted: HashSet<RecipeId> = sales.recipe_ids().into_iter().collect();
        let matched_recipes = recipes
            .into_iter()
            .filter(|recipe| wanted.contains(&recipe.id))
            .collect();
        let priced = self.resolver.price_many(matched_recipes).await;

        Ok(build_report(&request, sales, &priced))
    }

    /// Backend reachability
    ///
    /// # Errors
    ///
    /// Returns an error if the backend does not answer
    pub async fn health_check(&self) -> AppResult<()> {
        self.call("health check", self.store.health_check()).await
    }

    /// Storage backend description
    #[must_use]
    pub fn backend_info(&self) -> &'static str {
        self.store.backend_info()
    }

    async fn require_recipe(&self, id: RecipeId) -> AppResult<Recipe> {
        self.call("recipe lookup", self.store.get_recipe(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))
    }

    async fn ensure_targets_exist(&self, links: &[Link]) -> AppResult<()> {
        for link in links {
            match link.target() {
                Some(LinkTarget::Ingredient(ingredient_id)) => {
                    self.get_ingredient(ingredient_id).await?;
                }
                Some(LinkTarget::SubRecipe(child_id)) => {
                    self.require_recipe(child_id).await?;
                }
                None => {
                    return Err(AppError::invalid_input(
                        "a line must reference exactly one of ingredient_id or sub_recipe_id",
                    ));
                }
            }
        }
        Ok(())
    }
}
