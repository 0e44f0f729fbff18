// ABOUTME: Route handlers for ingredient endpoints
// ABOUTME: Cached listing and search, CRUD, and ERP price application
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use super::parse_path_id;
use crate::resources::ServerResources;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use recipe_core::errors::AppError;
use recipe_core::models::{
    CreateIngredientRequest, Ingredient, IngredientId, UpdateIngredientRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for listing ingredients
#[derive(Debug, Default, Deserialize)]
pub struct ListIngredientsQuery {
    /// Case-insensitive substring of the name or ERP product name
    pub search: Option<String>,
}

/// Ingredient listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ListIngredientsResponse {
    /// Matching ingredients
    pub ingredients: Vec<Ingredient>,
    /// Number of ingredients returned
    pub total: usize,
}

/// Body for applying an ERP price
#[derive(Debug, Deserialize)]
pub struct ErpPriceBody {
    /// ERP price per `unit`
    pub price: f64,
    /// ERP unit of measure (pound, kilogram, gallon, ...)
    pub unit: String,
}

/// Ingredient routes
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/ingredients",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/ingredients/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/ingredients/:id/erp-price", post(Self::handle_erp_price))
            .with_state(resources)
    }

    /// Handle GET /api/ingredients - List or search cached ingredients
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListIngredientsQuery>,
    ) -> Result<Response, AppError> {
        let ingredients = resources
            .recipes
            .list_ingredients(query.search.as_deref())
            .await;
        let response = ListIngredientsResponse {
            total: ingredients.len(),
            ingredients,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/ingredients - Create an ingredient
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateIngredientRequest>,
    ) -> Result<Response, AppError> {
        let ingredient = resources.recipes.create_ingredient(body).await?;
        Ok((StatusCode::CREATED, Json(ingredient)).into_response())
    }

    /// Handle GET /api/ingredients/:id - Read an ingredient
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id: IngredientId = parse_path_id(&id, "ingredient")?;
        let ingredient = resources.recipes.get_ingredient(id).await?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }

    /// Handle PUT /api/ingredients/:id - Update an ingredient
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<UpdateIngredientRequest>,
    ) -> Result<Response, AppError> {
        let id: IngredientId = parse_path_id(&id, "ingredient")?;
        let ingredient = resources.recipes.update_ingredient(id, body).await?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }

    /// Handle DELETE /api/ingredients/:id - Delete an ingredient
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id: IngredientId = parse_path_id(&id, "ingredient")?;
        resources.recipes.delete_ingredient(id).await?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Handle POST /api/ingredients/:id/erp-price - Apply an ERP price
    async fn handle_erp_price(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<ErpPriceBody>,
    ) -> Result<Response, AppError> {
        let id: IngredientId = parse_path_id(&id, "ingredient")?;
        let ingredient = resources
            .recipes
            .apply_erp_price(id, body.price, &body.unit)
            .await?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }
}
