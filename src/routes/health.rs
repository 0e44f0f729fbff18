// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Liveness plus backend reachability and Record Cache counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! Health check routes for service monitoring

use crate::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use recipe_core::constants::service_names::RECIPE_COST_SERVER;
use std::sync::Arc;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    /// Handle GET /health - Liveness, backend status, and cache counters
    ///
    /// Always 200: reads keep working from the cache while the backend is down.
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let backend = match resources.recipes.health_check().await {
            Ok(()) => serde_json::json!({ "status": "healthy" }),
            Err(e) => serde_json::json!({ "status": "unavailable", "error": e.message }),
        };
        let cache = resources.recipes.cache_stats().await;
        let body = serde_json::json!({
            "status": "healthy",
            "service": RECIPE_COST_SERVER,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "backend": {
                "type": resources.recipes.backend_info(),
                "health": backend,
            },
            "cache": cache,
        });
        (StatusCode::OK, Json(body)).into_response()
    }

    /// Handle GET /ready - 503 until the backend answers
    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Response {
        let (status, label) = match resources.recipes.health_check().await {
            Ok(()) => (StatusCode::OK, "ready"),
            Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not_ready"),
        };
        (
            status,
            Json(serde_json::json!({
                "status": label,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        )
            .into_response()
    }
}
