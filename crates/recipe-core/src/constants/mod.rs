// ABOUTME: Application constants organized by domain
// ABOUTME: Cache windows, resolver bounds, Q-Factor defaults, and unit divisors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

/// Record Cache timing constants
pub mod cache;

/// Cost resolution and pricing constants
pub mod costing;

/// ERP unit-of-measure conversion table
pub mod units;

/// Service identity used in logs and health responses
pub mod service_names {
    /// Name of the HTTP server binary
    pub const RECIPE_COST_SERVER: &str = "recipe-cost-server";
}
