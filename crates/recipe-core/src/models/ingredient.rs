// ABOUTME: Ingredient record with unit cost and origin (manual entry or ERP sync)
// ABOUTME: Includes create/update requests validated at the write boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use super::ids::IngredientId;
use super::validation::{require_name, require_non_negative};
use crate::errors::AppResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an ingredient's unit cost came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IngredientOrigin {
    /// Entered by an operator
    #[default]
    Manual,
    /// Overwritten by an ERP price synchronization
    Erp,
}

impl IngredientOrigin {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Erp => "erp",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "erp" => Self::Erp,
            _ => Self::Manual,
        }
    }
}

/// A purchasable ingredient priced per unit of measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier
    pub id: IngredientId,
    /// Display name
    pub name: String,
    /// Unit of measure the cost is expressed in
    pub unit: String,
    /// Currency per unit, never negative
    pub unit_cost: f64,
    /// Manual entry or ERP sync
    #[serde(default)]
    pub origin: IngredientOrigin,
    /// Product name in the ERP catalog, used for name-matched price sync
    #[serde(default)]
    pub external_product_name: Option<String>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Case-insensitive match against the name or the ERP product name
    #[must_use]
    pub fn matches_search(&self, needle_lowercase: &str) -> bool {
        self.name.to_lowercase().contains(needle_lowercase)
            || self
                .external_product_name
                .as_ref()
                .is_some_and(|n| n.to_lowercase().contains(needle_lowercase))
    }
}

/// Request to create an ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIngredientRequest {
    /// Display name
    pub name: String,
    /// Unit of measure
    pub unit: String,
    /// Currency per unit
    pub unit_cost: f64,
    /// Origin of the price, defaults to manual
    #[serde(default)]
    pub origin: IngredientOrigin,
    /// ERP product name
    #[serde(default)]
    pub external_product_name: Option<String>,
}

impl CreateIngredientRequest {
    /// Validate write-boundary constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the failed constraint
    pub fn validate(&self) -> AppResult<()> {
        require_name("name", &self.name)?;
        require_name("unit", &self.unit)?;
        require_non_negative("unit_cost", self.unit_cost)
    }

    /// Materialize the record with a fresh identifier
    #[must_use]
    pub fn into_ingredient(self) -> Ingredient {
        Ingredient {
            id: IngredientId::new(),
            name: self.name.trim().to_owned(),
            unit: self.unit.trim().to_owned(),
            unit_cost: self.unit_cost,
            origin: self.origin,
            external_product_name: self.external_product_name,
            updated_at: Utc::now(),
        }
    }
}

/// Partial update of an ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIngredientRequest {
    /// New display name
    pub name: Option<String>,
    /// New unit of measure
    pub unit: Option<String>,
    /// New unit cost
    pub unit_cost: Option<f64>,
    /// New origin
    pub origin: Option<IngredientOrigin>,
    /// New ERP product name
    pub external_product_name: Option<String>,
}

impl UpdateIngredientRequest {
    /// Validate the supplied fields
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the failed constraint
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_name("name", name)?;
        }
        if let Some(unit) = &self.unit {
            require_name("unit", unit)?;
        }
        if let Some(cost) = self.unit_cost {
            require_non_negative("unit_cost", cost)?;
        }
        Ok(())
    }

    /// Apply the supplied fields to an existing record
    pub fn apply_to(self, ingredient: &mut Ingredient) {
        if let Some(name) = self.name {
            ingredient.name = name.trim().to_owned();
        }
        if let Some(unit) = self.unit {
            ingredient.unit = unit.trim().to_owned();
        }
        if let Some(cost) = self.unit_cost {
            ingredient.unit_cost = cost;
        }
        if let Some(origin) = self.origin {
            ingredient.origin = origin;
        }
        if self.external_product_name.is_some() {
            ingredient.external_product_name = self.external_product_name;
        }
        ingredient.updated_at = Utc::now();
    }
}
