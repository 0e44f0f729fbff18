// ABOUTME: Core types and constants for the recipe costing platform
// ABOUTME: Foundation crate with error handling, domain models, and costing constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

#![deny(unsafe_code)]

//! # Recipe Core
//!
//! Foundation crate providing shared types and constants for recipe cost
//! resolution. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Cache, costing, and unit-conversion constants
//! - **models**: Ingredients, recipes, links, and the derived costing views

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Ingredient, Recipe, Link, `CostedLine`, `CostBreakdown`)
pub mod models;
