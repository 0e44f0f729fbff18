// ABOUTME: Currency rounding applied to priced responses at the HTTP boundary
// ABOUTME: The service layer keeps unrounded values; only serialized output is rounded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use crate::costing::cogs::CogsReport;
use recipe_core::constants::costing::PRESENTATION_DECIMALS;
use recipe_core::models::{CostBreakdown, CostedLine, PricedRecipe};

/// Round a currency amount to the presentation precision
#[must_use]
pub fn round_currency(value: f64) -> f64 {
    let scale = 10_f64.powi(PRESENTATION_DECIMALS);
    (value * scale).round() / scale
}

fn round_line(line: &mut CostedLine) {
    line.unit_cost = round_currency(line.unit_cost);
    line.total_cost = round_currency(line.total_cost);
}

fn round_breakdown(breakdown: &mut CostBreakdown) {
    breakdown.base_cost = round_currency(breakdown.base_cost);
    breakdown.q_factor_amount = round_currency(breakdown.q_factor_amount);
    breakdown.total_cost = round_currency(breakdown.total_cost);
    breakdown.cost_per_serving = round_currency(breakdown.cost_per_serving);
}

/// Priced recipe with every currency field rounded
#[must_use]
pub fn present_priced(mut priced: PricedRecipe) -> PricedRecipe {
    priced.lines.iter_mut().for_each(round_line);
    round_breakdown(&mut priced.breakdown);
    priced
}

/// Report with every currency field rounded
#[must_use]
pub fn present_report(mut report: CogsReport) -> CogsReport {
    for item in &mut report.items {
        item.cost_per_serving = round_currency(item.cost_per_serving);
        item.realized_cost = round_currency(item.realized_cost);
        item.revenue = round_currency(item.revenue);
        item.margin = round_currency(item.margin);
    }
    report.total_cost = round_currency(report.total_cost);
    report.total_revenue = round_currency(report.total_revenue);
    report.total_margin = round_currency(report.total_margin);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency_to_four_places() {
        assert!((round_currency(0.275_000_000_1) - 0.275).abs() < 1e-12);
        assert!((round_currency(1.234_56) - 1.2346).abs() < 1e-12);
        assert!(round_currency(0.0).abs() < f64::EPSILON);
    }
}
