// ABOUTME: Route handlers for Record Cache inspection and operator invalidation
// ABOUTME: Exposes cache counters and a manual clear trigger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use crate::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Cache routes
pub struct CacheRoutes;

impl CacheRoutes {
    /// Create cache routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/cache", get(Self::handle_stats))
            .route("/api/cache/clear", post(Self::handle_clear))
            .with_state(resources)
    }

    /// Handle GET /api/cache - Cache counters
    async fn handle_stats(State(resources): State<Arc<ServerResources>>) -> Response {
        let stats = resources.recipes.cache_stats().await;
        (StatusCode::OK, Json(stats)).into_response()
    }

    /// Handle POST /api/cache/clear - Invalidate the Record Cache
    async fn handle_clear(State(resources): State<Arc<ServerResources>>) -> Response {
        let stats = resources.recipes.clear_cache().await;
        (StatusCode::OK, Json(stats)).into_response()
    }
}
