// ABOUTME: Route handlers for recipe and recipe-line (link) endpoints
// ABOUTME: Priced single and batch reads, unpriced listing, and recipe/link writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! Recipe routes
//!
//! Single-recipe reads are priced; the list endpoint is unpriced for fast
//! browsing. Writes invalidate the Record Cache before responding.

use super::parse_path_id;
use super::presentation::present_priced;
use crate::resources::ServerResources;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use recipe_core::errors::AppError;
use recipe_core::models::{
    CreateLinkRequest, CreateRecipeRequest, Link, LinkId, PricedRecipe, Recipe, RecipeCategory,
    RecipeId, RecipeListFilter, UpdateLinkRequest, UpdateRecipeRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for listing recipes
#[derive(Debug, Default, Deserialize)]
pub struct ListRecipesQuery {
    /// Category filter
    pub category: Option<String>,
    /// Exclude inactive recipes
    pub active_only: Option<bool>,
    /// Case-insensitive name substring
    pub search: Option<String>,
}

/// Unpriced recipe listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRecipesResponse {
    /// Matching recipes, ordered by name
    pub recipes: Vec<Recipe>,
    /// Number of recipes returned
    pub total: usize,
}

/// Body for pricing several recipes at once
#[derive(Debug, Deserialize)]
pub struct BatchPriceBody {
    /// Recipes to price
    pub recipe_ids: Vec<RecipeId>,
}

/// Priced batch response
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPriceResponse {
    /// Priced recipes in request order
    pub recipes: Vec<PricedRecipe>,
}

/// Links owned by one recipe
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeLinksResponse {
    /// Stored links
    pub links: Vec<Link>,
}

/// Recipe routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe and link routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/recipes/batch", post(Self::handle_batch))
            .route(
                "/api/recipes/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/recipes/:id/links", get(Self::handle_links))
            .route("/api/links", post(Self::handle_create_link))
            .route(
                "/api/links/:id",
                put(Self::handle_update_link).delete(Self::handle_delete_link),
            )
            .with_state(resources)
    }

    /// Handle GET /api/recipes - List recipes without pricing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListRecipesQuery>,
    ) -> Result<Response, AppError> {
        let category = query
            .category
            .as_deref()
            .map(str::parse::<RecipeCategory>)
            .transpose()?;
        let filter = RecipeListFilter {
            category,
            active_only: query.active_only.unwrap_or(false),
            search: query.search,
        };
        let recipes = resources.recipes.list_recipes(&filter).await?;

        let response = ListRecipesResponse {
            total: recipes.len(),
            recipes,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/recipes - Create a recipe with its lines
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let priced = resources.recipes.create_recipe(body).await?;
        Ok((StatusCode::CREATED, Json(present_priced(priced))).into_response())
    }

    /// Handle POST /api/recipes/batch - Price several recipes together
    async fn handle_batch(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<BatchPriceBody>,
    ) -> Result<Response, AppError> {
        let priced = resources.recipes.get_priced_recipes(&body.recipe_ids).await?;
        let response = BatchPriceResponse {
            recipes: priced.into_iter().map(present_priced).collect(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/recipes/:id - Read a priced recipe
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id: RecipeId = parse_path_id(&id, "recipe")?;
        let priced = resources.recipes.get_priced_recipe(id).await?;
        Ok((StatusCode::OK, Json(present_priced(priced))).into_response())
    }

    /// Handle PUT /api/recipes/:id - Update a recipe
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<UpdateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let id: RecipeId = parse_path_id(&id, "recipe")?;
        let priced = resources.recipes.update_recipe(id, body).await?;
        Ok((StatusCode::OK, Json(present_priced(priced))).into_response())
    }

    /// Handle DELETE /api/recipes/:id - Delete a recipe and its lines
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id: RecipeId = parse_path_id(&id, "recipe")?;
        resources.recipes.delete_recipe(id).await?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Handle GET /api/recipes/:id/links - Stored lines of a recipe
    async fn handle_links(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id: RecipeId = parse_path_id(&id, "recipe")?;
        let links = resources.recipes.recipe_links(id).await?;
        Ok((StatusCode::OK, Json(RecipeLinksResponse { links })).into_response())
    }

    /// Handle POST /api/links - Add a line to a recipe
    async fn handle_create_link(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateLinkRequest>,
    ) -> Result<Response, AppError> {
        let link = resources.recipes.create_link(body).await?;
        Ok((StatusCode::CREATED, Json(link)).into_response())
    }

    /// Handle PUT /api/links/:id - Update a line
    async fn handle_update_link(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<UpdateLinkRequest>,
    ) -> Result<Response, AppError> {
        let id: LinkId = parse_path_id(&id, "link")?;
        let link = resources.recipes.update_link(id, body).await?;
        Ok((StatusCode::OK, Json(link)).into_response())
    }

    /// Handle DELETE /api/links/:id - Delete a line
    async fn handle_delete_link(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id: LinkId = parse_path_id(&id, "link")?;
        resources.recipes.delete_link(id).await?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
