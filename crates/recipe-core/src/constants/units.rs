// ABOUTME: ERP unit-of-measure divisors relative to the costing base unit
// ABOUTME: Base unit is the ounce (weight) or fluid ounce (volume)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

/// Divisor that turns an ERP per-unit price into a per-base-unit price.
///
/// Keys are lowercase ERP unit names; a price of `p` per pound becomes
/// `p / 16` per ounce.
pub const ERP_UNIT_DIVISORS: &[(&str, f64)] = &[
    ("pound", 16.0),
    ("lb", 16.0),
    ("lbs", 16.0),
    ("kilogram", 35.274),
    ("kg", 35.274),
    ("gram", 0.035_274),
    ("g", 0.035_274),
    ("ounce", 1.0),
    ("oz", 1.0),
    ("gallon", 128.0),
    ("gal", 128.0),
    ("liter", 33.814),
    ("litre", 33.814),
    ("l", 33.814),
    ("milliliter", 0.033_814),
    ("ml", 0.033_814),
    ("quart", 32.0),
    ("qt", 32.0),
    ("pint", 16.0),
    ("pt", 16.0),
    ("cup", 8.0),
    ("fluid ounce", 1.0),
    ("fl oz", 1.0),
    ("each", 1.0),
    ("ea", 1.0),
    ("unit", 1.0),
    ("units", 1.0),
];
