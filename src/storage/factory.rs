// ABOUTME: Record store factory choosing a backend from the configured connection string
// ABOUTME: Supports sqlite: URLs and memory:// for ephemeral in-process storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! Record store factory
//!
//! Automatic backend detection and creation based on connection strings.

use super::memory::InMemoryRecordStore;
use super::sqlite::SqliteRecordStore;
use super::RecordStore;
use recipe_core::errors::{AppError, AppResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Supported record store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// `SQLite` file or `sqlite::memory:`
    SQLite,
    /// Process-local, lost on restart
    Memory,
}

/// Detect the backend type from a connection string
///
/// # Errors
///
/// Returns an error if the URL scheme is not supported
pub fn detect_store_type(database_url: &str) -> AppResult<StoreType> {
    if database_url.starts_with("sqlite:") {
        Ok(StoreType::SQLite)
    } else if database_url.starts_with("memory://") {
        Ok(StoreType::Memory)
    } else {
        Err(AppError::config(format!(
            "Unsupported record store URL '{database_url}'. Use 'sqlite:<path>' or 'memory://'"
        )))
    }
}

/// Open the record store described by `database_url`
///
/// # Errors
///
/// Returns an error if the URL is unsupported or the backend fails to open
pub async fn open_record_store(database_url: &str) -> AppResult<Arc<dyn RecordStore>> {
    debug!("Detecting record store type from URL: {}", database_url);
    let store_type = detect_store_type(database_url)?;
    info!("Detected record store type: {:?}", store_type);

    let store: Arc<dyn RecordStore> = match store_type {
        StoreType::SQLite => Arc::new(SqliteRecordStore::new(database_url).await?),
        StoreType::Memory => Arc::new(InMemoryRecordStore::new()),
    };
    info!("Record store initialized: {}", store.backend_info());
    Ok(store)
}
