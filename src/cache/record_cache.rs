// ABOUTME: Snapshot cache over the record store with TTL, generation invalidation, and single-flight refresh
// ABOUTME: Fetches ingredients and links concurrently and swaps the whole snapshot on success
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use super::{CacheStats, RecordCacheConfig, RecordLookup, RecordSnapshot};
use crate::storage::{bounded, RecordStore};
use async_trait::async_trait;
use chrono::Utc;
use recipe_core::errors::AppResult;
use recipe_core::models::{Ingredient, Link, Recipe, RecipeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// Snapshot currently held, with the generation it was fetched under
struct HeldSnapshot {
    snapshot: Arc<RecordSnapshot>,
    generation: u64,
    expires_at: Instant,
}

impl HeldSnapshot {
    fn is_fresh(&self, generation: u64) -> bool {
        self.generation == generation && Instant::now() < self.expires_at
    }
}

/// Process-wide Record Cache
///
/// Readers clone an `Arc<RecordSnapshot>` out from under a short read lock,
/// so a refresh replaces the snapshot in one swap and no reader ever sees a
/// half-updated collection. Refreshes are single-flight: concurrent misses
/// wait on `refresh_lock` and reuse whatever the first one fetched.
pub struct RecordCache {
    store: Arc<dyn RecordStore>,
    config: RecordCacheConfig,
    held: RwLock<Option<HeldSnapshot>>,
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
    hits: AtomicU64,
    refreshes: AtomicU64,
    fallbacks: AtomicU64,
    empty_fallbacks: AtomicU64,
}

impl RecordCache {
    /// Create an empty cache; the first read fetches
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, config: RecordCacheConfig) -> Self {
        Self {
            store,
            config,
            held: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
            fallbacks: AtomicU64::new(0),
            empty_fallbacks: AtomicU64::new(0),
        }
    }

    /// Cache configuration
    #[must_use]
    pub const fn config(&self) -> &RecordCacheConfig {
        &self.config
    }

    /// Cached ingredient collection
    pub async fn get_ingredients(&self) -> Vec<Ingredient> {
        self.snapshot().await.ingredients().to_vec()
    }

    /// Cached link collection
    pub async fn get_links(&self) -> Vec<Link> {
        self.snapshot().await.links().to_vec()
    }

    /// Mark the held snapshot stale so the next read refetches
    ///
    /// Synchronous so write paths can call it before responding without an
    /// extra await point. A refresh already in flight stores its result
    /// under the old generation, which the next read treats as stale.
    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "Record cache invalidated");
    }

    /// Current counters and snapshot shape
    pub async fn stats(&self) -> CacheStats {
        let held = self.held.read().await;
        let (snapshot_age_secs, ingredient_count, link_count) =
            held.as_ref().map_or((None, 0, 0), |held| {
                (
                    Some((Utc::now() - held.snapshot.fetched_at()).num_seconds()),
                    held.snapshot.ingredients().len(),
                    held.snapshot.links().len(),
                )
            });
        drop(held);

        CacheStats {
            generation: self.generation.load(Ordering::SeqCst),
            hits: self.hits.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            empty_fallbacks: self.empty_fallbacks.load(Ordering::Relaxed),
            snapshot_age_secs,
            ingredient_count,
            link_count,
        }
    }

    async fn fresh_snapshot(&self) -> Option<Arc<RecordSnapshot>> {
        let generation = self.generation.load(Ordering::SeqCst);
        self.held
            .read()
            .await
            .as_ref()
            .filter(|held| held.is_fresh(generation))
            .map(|held| Arc::clone(&held.snapshot))
    }

    async fn fetch(&self) -> AppResult<RecordSnapshot> {
        let timeout = self.config.backend_timeout;
        let (ingredients, links) = tokio::try_join!(
            bounded(timeout, "ingredient fetch", self.store.list_ingredients()),
            bounded(timeout, "link fetch", self.store.list_links()),
        )?;
        Ok(RecordSnapshot::new(ingredients, links))
    }

    async fn refresh(&self) -> Arc<RecordSnapshot> {
        let _guard = self.refresh_lock.lock().await;

        // Another task may have refreshed while we waited
        if let Some(snapshot) = self.fresh_snapshot().await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return snapshot;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        match self.fetch().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                info!(
                    ingredients = snapshot.ingredients().len(),
                    links = snapshot.links().len(),
                    generation,
                    "Record cache refreshed"
                );
                *self.held.write().await = Some(HeldSnapshot {
                    snapshot: Arc::clone(&snapshot),
                    generation,
                    expires_at: Instant::now() + self.config.ttl,
                });
                self.refreshes.fetch_add(1, Ordering::Relaxed);
                snapshot
            }
            Err(e) => {
                let previous = self
                    .held
                    .read()
                    .await
                    .as_ref()
                    .map(|held| Arc::clone(&held.snapshot));
                if let Some(snapshot) = previous {
                    warn!(error = %e, "Record cache refresh failed, serving last good snapshot");
                    self.fallbacks.fetch_add(1, Ordering::Relaxed);
                    snapshot
                } else {
                    error!(error = %e, "Record cache refresh failed with no snapshot to fall back on");
                    self.empty_fallbacks.fetch_add(1, Ordering::Relaxed);
                    Arc::new(RecordSnapshot::empty())
                }
            }
        }
    }
}

#[async_trait]
impl RecordLookup for RecordCache {
    async fn snapshot(&self) -> Arc<RecordSnapshot> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Record cache hit");
            return snapshot;
        }
        self.refresh().await
    }

    async fn recipe(&self, id: RecipeId) -> AppResult<Option<Recipe>> {
        bounded(
            self.config.backend_timeout,
            "recipe lookup",
            self.store.get_recipe(id),
        )
        .await
    }
}
