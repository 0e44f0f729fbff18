// ABOUTME: Constants governing recipe cost resolution and Q-Factor pricing
// ABOUTME: Recursion bound, Q-Factor domain, and presentation precision
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

/// Default maximum sub-recipe recursion depth
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Q-Factor applied when a recipe does not specify one
pub const DEFAULT_Q_FACTOR_PERCENT: f64 = 10.0;

/// Lowest accepted Q-Factor percentage
pub const MIN_Q_FACTOR_PERCENT: f64 = 0.0;

/// Highest accepted Q-Factor percentage
pub const MAX_Q_FACTOR_PERCENT: f64 = 100.0;

/// Prefix applied to sub-recipe line names
pub const SUB_RECIPE_PREFIX: &str = "[Sub-recipe] ";

/// Decimal places kept when costs are presented to clients
pub const PRESENTATION_DECIMALS: i32 = 4;

/// Longest POS sales window accepted by the cost-of-goods report, in seconds
pub const MAX_SALES_WINDOW_SECS: i64 = 3_600;
