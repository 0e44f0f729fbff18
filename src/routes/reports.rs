// ABOUTME: Route handlers for cost reports layered on top of recipe pricing
// ABOUTME: Cost-of-goods-sold over a POS sales window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use super::presentation::present_report;
use crate::costing::cogs::CogsRequest;
use crate::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use recipe_core::errors::AppError;
use std::sync::Arc;

/// Report routes
pub struct ReportRoutes;

impl ReportRoutes {
    /// Create report routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/reports/cogs", post(Self::handle_cogs))
            .with_state(resources)
    }

    /// Handle POST /api/reports/cogs - Realized cost of goods sold
    async fn handle_cogs(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CogsRequest>,
    ) -> Result<Response, AppError> {
        let report = resources.recipes.cost_of_goods_sold(body).await?;
        Ok((StatusCode::OK, Json(present_report(report))).into_response())
    }
}
