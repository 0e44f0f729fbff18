// ABOUTME: Environment-driven server configuration for ports, storage, cache, and resolver tuning
// ABOUTME: Every setting has a default; malformed values fail startup with context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use crate::cache::RecordCacheConfig;
use crate::costing::{ResolverConfig, SubRecipePricing};
use anyhow::{Context, Result};
use recipe_core::constants::cache::{DEFAULT_BACKEND_TIMEOUT_SECS, DEFAULT_RECORD_CACHE_TTL_SECS};
use recipe_core::constants::costing::DEFAULT_MAX_DEPTH;
use std::env;
use std::time::Duration;
use tracing::info;

/// Default HTTP listen port
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default record-storage backend
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/recipes.db";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Record-storage backend URL (`sqlite:...` or `memory://`)
    pub database_url: String,
    /// Record Cache settings
    pub cache: RecordCacheConfig,
    /// Cost resolver settings
    pub resolver: ResolverConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            cache: RecordCacheConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable whose value cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            cache: RecordCacheConfig {
                ttl: Duration::from_secs(
                    env_var_or(
                        "RECORD_CACHE_TTL_SECS",
                        &DEFAULT_RECORD_CACHE_TTL_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid RECORD_CACHE_TTL_SECS value")?,
                ),
                backend_timeout: Duration::from_secs(
                    env_var_or(
                        "BACKEND_TIMEOUT_SECS",
                        &DEFAULT_BACKEND_TIMEOUT_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid BACKEND_TIMEOUT_SECS value")?,
                ),
            },
            resolver: ResolverConfig {
                max_depth: env_var_or("RESOLVER_MAX_DEPTH", &DEFAULT_MAX_DEPTH.to_string())
                    .parse()
                    .context("Invalid RESOLVER_MAX_DEPTH value")?,
                sub_recipe_pricing: SubRecipePricing::parse(&env_var_or(
                    "SUB_RECIPE_QFACTOR",
                    SubRecipePricing::Included.as_str(),
                ))
                .context("Invalid SUB_RECIPE_QFACTOR value")?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a duration is zero
    pub fn validate(&self) -> Result<()> {
        if self.cache.backend_timeout.is_zero() {
            return Err(anyhow::anyhow!("BACKEND_TIMEOUT_SECS must be greater than 0"));
        }
        if self.database_url.trim().is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL must not be empty"));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Recipe Cost Server Configuration:\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - Record Cache TTL: {}s\n\
             - Backend Timeout: {}s\n\
             - Resolver Max Depth: {}\n\
             - Sub-recipe Q-Factor: {}",
            self.http_port,
            self.database_url,
            self.cache.ttl.as_secs(),
            self.cache.backend_timeout.as_secs(),
            self.resolver.max_depth,
            self.resolver.sub_recipe_pricing.as_str(),
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
