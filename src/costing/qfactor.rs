// ABOUTME: Q-Factor calculator turning a costed line list into a cost breakdown
// ABOUTME: Pure arithmetic applied exactly once per recipe level
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use recipe_core::models::{CostBreakdown, CostedLine};

/// Servings used as a divisor; zero or negative counts are treated as one
#[must_use]
pub fn effective_servings(servings: i32) -> f64 {
    f64::from(servings.max(1))
}

/// Price a recipe from its costed lines
///
/// `base = sum(line.total_cost)`, `surcharge = base * q / 100`,
/// `total = base + surcharge`, `per_serving = total / max(servings, 1)`.
#[must_use]
pub fn price_recipe(lines: &[CostedLine], servings: i32, q_factor_percent: f64) -> CostBreakdown {
    let base_cost: f64 = lines.iter().map(|line| line.total_cost).sum();
    let q_factor_amount = base_cost * (q_factor_percent / 100.0);
    let total_cost = base_cost + q_factor_amount;

    CostBreakdown {
        base_cost,
        q_factor_percent,
        q_factor_amount,
        total_cost,
        cost_per_serving: total_cost / effective_servings(servings),
    }
}
