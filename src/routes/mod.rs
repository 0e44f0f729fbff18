// ABOUTME: Route module organization for the recipe cost server HTTP endpoints
// ABOUTME: Assembles per-domain routers and the request tracing layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! Route module
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the Recipe Service.

/// Record Cache inspection and invalidation routes
pub mod cache;
/// Health check and readiness routes
pub mod health;
/// Ingredient routes
pub mod ingredients;
/// Response rounding
pub mod presentation;
/// Cost report routes
pub mod reports;
/// Recipe and link routes
pub mod recipes;

pub use cache::CacheRoutes;
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use reports::ReportRoutes;

use crate::resources::ServerResources;
use axum::Router;
use recipe_core::errors::{AppError, AppResult};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the complete application router
pub fn router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(RecipeRoutes::routes(Arc::clone(resources)))
        .merge(IngredientRoutes::routes(Arc::clone(resources)))
        .merge(CacheRoutes::routes(Arc::clone(resources)))
        .merge(ReportRoutes::routes(Arc::clone(resources)))
        .layer(TraceLayer::new_for_http())
}

/// Parse an identifier taken from the request path
pub(crate) fn parse_path_id<T>(raw: &str, resource: &str) -> AppResult<T>
where
    T: FromStr<Err = uuid::Error>,
{
    raw.parse().map_err(|e: uuid::Error| {
        AppError::invalid_input(format!("Invalid {resource} id '{raw}': {e}"))
    })
}
