// ABOUTME: Main library entry point for the recipe cost resolution server
// ABOUTME: Record Cache, recursive cost resolver, Recipe Service, and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

#![deny(unsafe_code)]

//! # Recipe Cost Server
//!
//! Computes the cost of prepared-food recipes from ingredient costs and from
//! other recipes used as components (sub-recipes), and serves the priced
//! recipes over HTTP.
//!
//! ## Architecture
//!
//! - **Storage**: record-storage backends (SQLite, in-memory) fetched in bulk
//! - **Cache**: time-boxed snapshot of ingredients and links with fail-open reads
//! - **Costing**: link deduplication, depth-bounded resolution, Q-Factor pricing
//! - **Services**: the Recipe Service ordering writes, invalidation, and reads
//! - **Routes**: thin axum handlers over the Recipe Service
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use recipe_cost_server::config::ServerConfig;
//! use recipe_cost_server::resources::ServerResources;
//! use recipe_cost_server::storage::factory::open_record_store;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! let store = open_record_store(&config.database_url).await?;
//! let resources = ServerResources::new(config, store);
//! let roll = resources.recipes.list_recipes(&Default::default()).await?;
//! println!("{} recipes", roll.len());
//! # Ok(())
//! # }
//! ```

/// Record Cache over the record-storage backend
pub mod cache;

/// Environment configuration
pub mod config;

/// Cost resolution engine and reports
pub mod costing;

/// Unified error handling re-exported from `recipe_core`
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Shared server state
pub mod resources;

/// HTTP routes
pub mod routes;

/// HTTP server lifecycle
pub mod server;

/// Recipe Service
pub mod services;

/// Record-storage backends
pub mod storage;
