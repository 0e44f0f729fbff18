// ABOUTME: Integration tests for the Record Cache snapshot lifecycle
// ABOUTME: Covers TTL expiry, write invalidation, single-flight refresh, and fail-open reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use async_trait::async_trait;
use common::{ingredient, ingredient_link, init_test_logging, recipe, seed, test_cache_config};
use recipe_core::errors::{AppError, AppResult, ErrorCode};
use recipe_core::models::{Ingredient, IngredientId, Link, LinkId, Recipe, RecipeId};
use recipe_cost_server::cache::{RecordCache, RecordCacheConfig, RecordLookup};
use recipe_cost_server::storage::{memory::InMemoryRecordStore, RecipeWrite, RecordStore};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Store wrapper that counts bulk fetches and can be switched off or slowed down
struct FlakyStore {
    inner: InMemoryRecordStore,
    failing: AtomicBool,
    delay: Option<Duration>,
    ingredient_fetches: AtomicU32,
    link_fetches: AtomicU32,
}

impl FlakyStore {
    fn new(inner: InMemoryRecordStore) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
            delay: None,
            ingredient_fetches: AtomicU32::new(0),
            link_fetches: AtomicU32::new(0),
        }
    }

    fn slow(inner: InMemoryRecordStore, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(inner)
        }
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn fetches(&self) -> u32 {
        self.ingredient_fetches.load(Ordering::SeqCst)
    }

    async fn gate(&self) -> AppResult<()> {
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::backend("backend offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    fn backend_info(&self) -> &'static str {
        "Flaky (test)"
    }

    async fn health_check(&self) -> AppResult<()> {
        self.gate().await
    }

    async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        self.ingredient_fetches.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.inner.list_ingredients().await
    }

    async fn get_ingredient(&self, id: IngredientId) -> AppResult<Option<Ingredient>> {
        self.gate().await?;
        self.inner.get_ingredient(id).await
    }

    async fn create_ingredient(&self, ingredient: &Ingredient) -> AppResult<()> {
        self.inner.create_ingredient(ingredient).await
    }

    async fn update_ingredient(&self, ingredient: &Ingredient) -> AppResult<()> {
        self.inner.update_ingredient(ingredient).await
    }

    async fn delete_ingredient(&self, id: IngredientId) -> AppResult<bool> {
        self.inner.delete_ingredient(id).await
    }

    async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        self.gate().await?;
        self.inner.list_recipes().await
    }

    async fn get_recipe(&self, id: RecipeId) -> AppResult<Option<Recipe>> {
        self.gate().await?;
        self.inner.get_recipe(id).await
    }

    async fn create_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        self.inner.create_recipe(recipe).await
    }

    async fn delete_recipe(&self, id: RecipeId) -> AppResult<bool> {
        self.inner.delete_recipe(id).await
    }

    async fn list_links(&self) -> AppResult<Vec<Link>> {
        self.link_fetches.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.inner.list_links().await
    }

    async fn get_link(&self, id: LinkId) -> AppResult<Option<Link>> {
        self.inner.get_link(id).await
    }

    async fn create_link(&self, link: &Link) -> AppResult<()> {
        self.inner.create_link(link).await
    }

    async fn update_link(&self, link: &Link) -> AppResult<()> {
        self.inner.update_link(link).await
    }

    async fn delete_link(&self, id: LinkId) -> AppResult<bool> {
        self.inner.delete_link(id).await
    }

    async fn save_recipe(
        &self,
        recipe: &Recipe,
        links: Option<&[Link]>,
        write: RecipeWrite,
    ) -> AppResult<()> {
        self.inner.save_recipe(recipe, links, write).await
    }
}

async fn seeded_store() -> (InMemoryRecordStore, Ingredient) {
    let store = InMemoryRecordStore::new();
    let rice = ingredient("Rice", 0.5);
    let roll = recipe("Roll", 4, 10.0);
    let links = vec![ingredient_link(roll.id, rice.id, 2.0)];
    seed(&store, &[&rice], &[&roll], links).await;
    (store, rice)
}

fn cache_over(store: &Arc<FlakyStore>, config: RecordCacheConfig) -> RecordCache {
    init_test_logging();
    let store: Arc<dyn RecordStore> = store.clone();
    RecordCache::new(store, config)
}

#[tokio::test]
async fn test_snapshot_served_from_cache_within_ttl() {
    let (inner, _) = seeded_store().await;
    let store = Arc::new(FlakyStore::new(inner));
    let cache = cache_over(&store, test_cache_config());

    assert_eq!(cache.get_ingredients().await.len(), 1);
    assert_eq!(cache.get_links().await.len(), 1);
    assert_eq!(cache.get_ingredients().await.len(), 1);

    assert_eq!(store.fetches(), 1);
    assert_eq!(store.link_fetches.load(Ordering::SeqCst), 1);

    let stats = cache.stats().await;
    assert_eq!(stats.refreshes, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.ingredient_count, 1);
    assert_eq!(stats.link_count, 1);
}

#[tokio::test]
async fn test_snapshot_refetched_after_ttl() {
    let (inner, _) = seeded_store().await;
    let store = Arc::new(FlakyStore::new(inner));
    let cache = cache_over(
        &store,
        RecordCacheConfig {
            ttl: Duration::from_millis(50),
            backend_timeout: Duration::from_secs(5),
        },
    );

    cache.snapshot().await;
    sleep(Duration::from_millis(120)).await;
    cache.snapshot().await;

    assert_eq!(store.fetches(), 2);
}

#[tokio::test]
async fn test_invalidate_forces_refetch_within_ttl() {
    let (inner, rice) = seeded_store().await;
    let store = Arc::new(FlakyStore::new(inner.clone()));
    let cache = cache_over(&store, test_cache_config());

    let before = cache.snapshot().await;
    assert!((before.ingredient(rice.id).unwrap().unit_cost - 0.5).abs() < f64::EPSILON);

    let mut updated = rice.clone();
    updated.unit_cost = 0.75;
    inner.update_ingredient(&updated).await.unwrap();
    cache.invalidate();

    let after = cache.snapshot().await;
    assert!((after.ingredient(rice.id).unwrap().unit_cost - 0.75).abs() < f64::EPSILON);
    assert_eq!(store.fetches(), 2);
    assert_eq!(cache.stats().await.generation, 1);
}

#[tokio::test]
async fn test_failed_refresh_serves_last_good_snapshot() {
    let (inner, rice) = seeded_store().await;
    let store = Arc::new(FlakyStore::new(inner));
    let cache = cache_over(&store, test_cache_config());

    cache.snapshot().await;
    store.set_failing(true);
    cache.invalidate();

    let snapshot = cache.snapshot().await;
    assert!(snapshot.ingredient(rice.id).is_some());

    let stats = cache.stats().await;
    assert_eq!(stats.fallbacks, 1);
    assert_eq!(stats.empty_fallbacks, 0);
}

#[tokio::test]
async fn test_failed_first_refresh_serves_empty_snapshot() {
    let (inner, _) = seeded_store().await;
    let store = Arc::new(FlakyStore::new(inner));
    store.set_failing(true);
    let cache = cache_over(&store, test_cache_config());

    assert!(cache.get_ingredients().await.is_empty());
    assert!(cache.get_links().await.is_empty());
    assert_eq!(cache.stats().await.empty_fallbacks, 2);

    // Backend recovers: the next read fetches for real
    store.set_failing(false);
    assert_eq!(cache.get_ingredients().await.len(), 1);
}

#[tokio::test]
async fn test_backend_timeout_falls_back() {
    let (inner, _) = seeded_store().await;
    let store = Arc::new(FlakyStore::slow(inner, Duration::from_millis(500)));
    let cache = cache_over(
        &store,
        RecordCacheConfig {
            ttl: Duration::from_secs(300),
            backend_timeout: Duration::from_millis(20),
        },
    );

    let snapshot = cache.snapshot().await;
    assert!(snapshot.ingredients().is_empty());
    assert_eq!(cache.stats().await.empty_fallbacks, 1);
}

#[tokio::test]
async fn test_concurrent_misses_share_one_refresh() {
    let (inner, _) = seeded_store().await;
    let store = Arc::new(FlakyStore::slow(inner, Duration::from_millis(50)));
    let cache = Arc::new(cache_over(&store, test_cache_config()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move { cache.snapshot().await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().ingredients().len(), 1);
    }

    assert_eq!(store.fetches(), 1);
}

#[tokio::test]
async fn test_recipe_lookup_propagates_backend_error() {
    let (inner, _) = seeded_store().await;
    let store = Arc::new(FlakyStore::new(inner));
    let cache = cache_over(&store, test_cache_config());
    store.set_failing(true);

    let err = cache.recipe(RecipeId::new()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BackendError);
}

#[tokio::test]
async fn test_stats_before_first_read() {
    let (inner, _) = seeded_store().await;
    let store = Arc::new(FlakyStore::new(inner));
    let cache = cache_over(&store, test_cache_config());

    let stats = cache.stats().await;
    assert_eq!(stats.snapshot_age_secs, None);
    assert_eq!(stats.ingredient_count, 0);
    assert_eq!(store.fetches(), 0);
}
