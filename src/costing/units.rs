// ABOUTME: ERP unit-of-measure conversion into the costing base unit
// ABOUTME: Turns an ERP per-unit price into a per-ounce (or per-each) unit cost
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use recipe_core::constants::units::ERP_UNIT_DIVISORS;
use recipe_core::errors::{AppError, AppResult};

/// Divisor for an ERP unit name, matched case-insensitively
#[must_use]
pub fn erp_unit_divisor(erp_unit: &str) -> Option<f64> {
    let normalized = erp_unit.trim().to_lowercase();
    ERP_UNIT_DIVISORS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|&(_, divisor)| divisor)
}

/// Convert an ERP price per `erp_unit` into a price per base unit
///
/// # Errors
///
/// Returns an error if the price is negative or the unit is not recognised
pub fn convert_erp_price(price: f64, erp_unit: &str) -> AppResult<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::value_out_of_range("price", "must not be negative"));
    }
    let divisor = erp_unit_divisor(erp_unit).ok_or_else(|| {
        AppError::invalid_input(format!("Unknown ERP unit of measure: {erp_unit}"))
            .with_details(serde_json::json!({ "unit": erp_unit }))
    })?;
    Ok(price / divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::errors::ErrorCode;

    #[test]
    fn test_divisor_lookup_ignores_case_and_whitespace() {
        assert_eq!(erp_unit_divisor("Pound"), Some(16.0));
        assert_eq!(erp_unit_divisor(" KG "), Some(35.274));
        assert_eq!(erp_unit_divisor("fathom"), None);
    }

    #[test]
    fn test_price_per_pound_becomes_price_per_ounce() {
        let per_ounce = convert_erp_price(8.0, "lb").unwrap();
        assert!((per_ounce - 0.5).abs() < 1e-12);

        let per_fluid_ounce = convert_erp_price(12.8, "gallon").unwrap();
        assert!((per_fluid_ounce - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_unknown_unit_and_negative_price() {
        let err = convert_erp_price(1.0, "bushel").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = convert_erp_price(-1.0, "lb").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
