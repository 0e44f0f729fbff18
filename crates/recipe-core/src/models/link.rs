// ABOUTME: Link records joining a parent recipe to one ingredient or one sub-recipe
// ABOUTME: Malformed links (neither or both references) stay representable so reads can skip them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use super::ids::{IngredientId, LinkId, RecipeId};
use super::validation::{require_name, require_positive};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// What a well-formed link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    /// A purchasable ingredient
    Ingredient(IngredientId),
    /// Another recipe consumed by servings
    SubRecipe(RecipeId),
}

impl LinkTarget {
    /// Build a target from the two optional references
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one reference is set
    pub fn from_parts(
        ingredient_id: Option<IngredientId>,
        child_recipe_id: Option<RecipeId>,
    ) -> AppResult<Self> {
        match (ingredient_id, child_recipe_id) {
            (Some(ingredient), None) => Ok(Self::Ingredient(ingredient)),
            (None, Some(child)) => Ok(Self::SubRecipe(child)),
            (Some(_), Some(_)) => Err(AppError::invalid_input(
                "a line must reference an ingredient or a sub-recipe, not both",
            )),
            (None, None) => Err(AppError::invalid_input(
                "a line must reference an ingredient or a sub-recipe",
            )),
        }
    }
}

/// A stored usage of an ingredient or sub-recipe inside a parent recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Unique identifier
    pub id: LinkId,
    /// Recipe that consumes the target
    pub parent_recipe_id: RecipeId,
    /// Ingredient reference
    pub ingredient_id: Option<IngredientId>,
    /// Sub-recipe reference
    pub child_recipe_id: Option<RecipeId>,
    /// Quantity used; servings consumed for sub-recipes
    pub quantity: f64,
    /// Unit of measure for this usage
    pub unit: String,
    /// Optional preparation note
    #[serde(default)]
    pub note: Option<String>,
}

impl Link {
    /// Target of a well-formed link, `None` when malformed
    #[must_use]
    pub const fn target(&self) -> Option<LinkTarget> {
        match (self.ingredient_id, self.child_recipe_id) {
            (Some(ingredient), None) => Some(LinkTarget::Ingredient(ingredient)),
            (None, Some(child)) => Some(LinkTarget::SubRecipe(child)),
            _ => None,
        }
    }
}

/// Request to add a single link to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    /// Recipe that consumes the target
    pub parent_recipe_id: RecipeId,
    /// Ingredient reference
    #[serde(default)]
    pub ingredient_id: Option<IngredientId>,
    /// Sub-recipe reference
    #[serde(default)]
    pub sub_recipe_id: Option<RecipeId>,
    /// Quantity used
    pub quantity: f64,
    /// Unit of measure
    pub unit: String,
    /// Optional preparation note
    #[serde(default)]
    pub note: Option<String>,
}

impl CreateLinkRequest {
    /// Validate write-boundary constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the failed constraint
    pub fn validate(&self) -> AppResult<()> {
        let target = LinkTarget::from_parts(self.ingredient_id, self.sub_recipe_id)?;
        if target == LinkTarget::SubRecipe(self.parent_recipe_id) {
            return Err(AppError::invalid_input(format!(
                "recipe {} cannot use itself as a sub-recipe",
                self.parent_recipe_id
            )));
        }
        require_positive("quantity", self.quantity)?;
        require_name("unit", &self.unit)
    }

    /// Materialize the record with a fresh identifier
    #[must_use]
    pub fn into_link(self) -> Link {
        Link {
            id: LinkId::new(),
            parent_recipe_id: self.parent_recipe_id,
            ingredient_id: self.ingredient_id,
            child_recipe_id: self.sub_recipe_id,
            quantity: self.quantity,
            unit: self.unit.trim().to_owned(),
            note: self.note,
        }
    }
}

/// Partial update of a link's usage fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLinkRequest {
    /// New quantity
    pub quantity: Option<f64>,
    /// New unit
    pub unit: Option<String>,
    /// New note
    pub note: Option<String>,
}

impl UpdateLinkRequest {
    /// Validate the supplied fields
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the failed constraint
    pub fn validate(&self) -> AppResult<()> {
        if let Some(quantity) = self.quantity {
            require_positive("quantity", quantity)?;
        }
        if let Some(unit) = &self.unit {
            require_name("unit", unit)?;
        }
        Ok(())
    }

    /// Apply the supplied fields to an existing link
    pub fn apply_to(self, link: &mut Link) {
        if let Some(quantity) = self.quantity {
            link.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            link.unit = unit.trim().to_owned();
        }
        if self.note.is_some() {
            link.note = self.note;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(ingredient: Option<IngredientId>, child: Option<RecipeId>) -> Link {
        Link {
            id: LinkId::new(),
            parent_recipe_id: RecipeId::new(),
            ingredient_id: ingredient,
            child_recipe_id: child,
            quantity: 1.0,
            unit: "oz".to_owned(),
            note: None,
        }
    }

    #[test]
    fn test_target_requires_exactly_one_reference() {
        let ingredient = IngredientId::new();
        let child = RecipeId::new();
        assert_eq!(
            link(Some(ingredient), None).target(),
            Some(LinkTarget::Ingredient(ingredient))
        );
        assert_eq!(
            link(None, Some(child)).target(),
            Some(LinkTarget::SubRecipe(child))
        );
        assert_eq!(link(None, None).target(), None);
        assert_eq!(link(Some(ingredient), Some(child)).target(), None);
    }

    #[test]
    fn test_create_link_rejects_self_reference() {
        let parent = RecipeId::new();
        let request = CreateLinkRequest {
            parent_recipe_id: parent,
            ingredient_id: None,
            sub_recipe_id: Some(parent),
            quantity: 1.0,
            unit: "serving".to_owned(),
            note: None,
        };
        assert!(request.validate().is_err());
    }
}
