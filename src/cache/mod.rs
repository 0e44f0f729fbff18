// ABOUTME: Record Cache shielding cost resolution from per-lookup backend round trips
// ABOUTME: Time-boxed, all-or-nothing snapshot of ingredients and links with fail-open reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! # Record Cache
//!
//! The resolver never talks to the record-storage backend per lookup. It asks
//! a [`RecordLookup`] for a [`RecordSnapshot`], which the [`RecordCache`]
//! refreshes in two bulk fetches at most once per time-to-live window.
//!
//! Writes call [`RecordCache::invalidate`] before returning so the next read
//! always refetches. A failed refresh serves the last good snapshot.

/// Cache implementation over a [`crate::storage::RecordStore`]
pub mod record_cache;
/// Immutable indexed snapshot
pub mod snapshot;

pub use record_cache::RecordCache;
pub use snapshot::RecordSnapshot;

use async_trait::async_trait;
use recipe_core::constants::cache::{DEFAULT_BACKEND_TIMEOUT_SECS, DEFAULT_RECORD_CACHE_TTL_SECS};
use recipe_core::errors::AppResult;
use recipe_core::models::{Recipe, RecipeId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Read access the cost resolver needs
///
/// Injected into the resolver so tests can substitute an in-memory fake.
#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Current ingredient and link snapshot; never fails
    async fn snapshot(&self) -> Arc<RecordSnapshot>;

    /// Look up one recipe's header (servings, Q-Factor, name)
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot answer
    async fn recipe(&self, id: RecipeId) -> AppResult<Option<Recipe>>;
}

/// Record Cache configuration
#[derive(Debug, Clone, Copy)]
pub struct RecordCacheConfig {
    /// How long a snapshot is served before refetching
    pub ttl: Duration,
    /// Upper bound on each backend call
    pub backend_timeout: Duration,
}

impl Default for RecordCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_RECORD_CACHE_TTL_SECS),
            backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
        }
    }
}

/// Cache counters reported on the cache endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CacheStats {
    /// Invalidation generation; bumped on every write
    pub generation: u64,
    /// Reads served from a fresh snapshot
    pub hits: u64,
    /// Successful bulk refreshes
    pub refreshes: u64,
    /// Failed refreshes answered from the last good snapshot
    pub fallbacks: u64,
    /// Failed refreshes with no snapshot to fall back on
    pub empty_fallbacks: u64,
    /// Seconds since the held snapshot was fetched
    pub snapshot_age_secs: Option<i64>,
    /// Ingredients in the held snapshot
    pub ingredient_count: usize,
    /// Links in the held snapshot
    pub link_count: usize,
}
