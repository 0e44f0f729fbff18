// ABOUTME: Shared server state handed to every route as axum State
// ABOUTME: Owns the record store, the Record Cache, and the Recipe Service built over them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use crate::cache::RecordCache;
use crate::config::ServerConfig;
use crate::services::RecipeService;
use crate::storage::RecordStore;
use std::sync::Arc;

/// Dependencies shared across request handlers
///
/// Built once at startup and wrapped in `Arc` so each handler clones a
/// pointer rather than the cache or store.
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Record-storage backend
    pub store: Arc<dyn RecordStore>,
    /// Process-wide Record Cache
    pub cache: Arc<RecordCache>,
    /// Recipe Service
    pub recipes: RecipeService,
}

impl ServerResources {
    /// Wire the cache and service over an opened store
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn RecordStore>) -> Self {
        let cache = Arc::new(RecordCache::new(Arc::clone(&store), config.cache));
        let recipes = RecipeService::new(Arc::clone(&store), Arc::clone(&cache), config.resolver);
        Self {
            config: Arc::new(config),
            store,
            cache,
            recipes,
        }
    }
}
