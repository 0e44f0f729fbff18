// ABOUTME: Write-boundary numeric and text validation shared by record requests
// ABOUTME: Each failure names the field and the constraint it violated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use crate::constants::costing::{MAX_Q_FACTOR_PERCENT, MIN_Q_FACTOR_PERCENT};
use crate::errors::{AppError, AppResult};

pub(crate) fn require_name(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::missing_field(field));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::value_out_of_range(
            field,
            "must be greater than 0",
        ));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::value_out_of_range(field, "must not be negative"));
    }
    Ok(())
}

pub(crate) fn require_servings(value: i32) -> AppResult<()> {
    if value <= 0 {
        return Err(AppError::value_out_of_range(
            "servings",
            "must be greater than 0",
        ));
    }
    Ok(())
}

pub(crate) fn require_q_factor(value: f64) -> AppResult<()> {
    if !value.is_finite() || !(MIN_Q_FACTOR_PERCENT..=MAX_Q_FACTOR_PERCENT).contains(&value) {
        return Err(AppError::value_out_of_range(
            "q_factor_percent",
            format!("must be between {MIN_Q_FACTOR_PERCENT} and {MAX_Q_FACTOR_PERCENT}"),
        ));
    }
    Ok(())
}
