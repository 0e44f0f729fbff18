// ABOUTME: Server binary for the recipe cost resolution service
// ABOUTME: Loads configuration, opens the record store, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! # Recipe Cost Server Binary
//!
//! Starts the HTTP API over a SQLite (or in-memory) record store.

use anyhow::Result;
use clap::Parser;
use recipe_cost_server::{
    config::ServerConfig, logging, resources::ServerResources, server::RecipeCostServer,
    storage::factory::open_record_store,
};
use std::env;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "recipe-cost-server")]
#[command(about = "Recipe cost resolution server")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override record-storage backend URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;
    info!("{}", config.summary());

    let store = open_record_store(&config.database_url).await?;
    info!("Record store initialized: {}", store.backend_info());

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(config, store));
    display_available_endpoints(port);

    if let Err(e) = RecipeCostServer::new(resources).run(port).await {
        error!("Server error: {}", e);
        return Err(e);
    }
    Ok(())
}

/// Log the served endpoints
fn display_available_endpoints(port: u16) {
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    info!("=== Available API Endpoints ===");
    info!("   Health:          GET  http://{host}:{port}/health");
    info!("   Recipes:         GET  http://{host}:{port}/api/recipes");
    info!("   Priced Recipe:   GET  http://{host}:{port}/api/recipes/{{id}}");
    info!("   Batch Pricing:   POST http://{host}:{port}/api/recipes/batch");
    info!("   Ingredients:     GET  http://{host}:{port}/api/ingredients?search=");
    info!("   Links:           POST http://{host}:{port}/api/links");
    info!("   Cache Stats:     GET  http://{host}:{port}/api/cache");
    info!("   Cache Clear:     POST http://{host}:{port}/api/cache/clear");
    info!("   COGS Report:     POST http://{host}:{port}/api/reports/cogs");
    info!("=== End of Endpoint List ===");
}
