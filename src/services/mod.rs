// ABOUTME: Domain service layer between HTTP routes and the costing engine
// ABOUTME: Orchestrates store writes, cache invalidation, and priced reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! Domain service layer
//!
//! Route handlers stay thin: they parse requests and shape responses, while
//! the service owns ordering (write, then invalidate, then read) and the
//! choice between cached and direct backend reads.

/// Recipe Service: priced reads, batch reads, writes, and reports
pub mod recipes;

pub use recipes::RecipeService;
