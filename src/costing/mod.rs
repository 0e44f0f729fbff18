// ABOUTME: Recipe cost resolution engine and the reports layered on top of it
// ABOUTME: Link deduplication, recursive resolution, Q-Factor pricing, ERP units, and COGS
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

/// Cost-of-goods-sold report over POS sales
pub mod cogs;
/// Duplicate link collapsing
pub mod dedupe;
/// Q-Factor calculator
pub mod qfactor;
/// Recursive cost resolver
pub mod resolver;
/// ERP unit-of-measure conversion
pub mod units;

pub use dedupe::{dedupe, dedupe_links, Deduplication, MergedLink};
pub use qfactor::price_recipe;
pub use resolver::{CostResolver, Resolution, ResolverConfig, SubRecipePricing};
