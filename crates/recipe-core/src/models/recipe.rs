// ABOUTME: Recipe record with servings, Q-Factor, category, and ordered instructions
// ABOUTME: Create/update requests carry the nested ingredient and sub-recipe lines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use super::ids::{IngredientId, RecipeId};
use super::link::{Link, LinkTarget};
use super::validation::{require_name, require_positive, require_q_factor, require_servings};
use crate::constants::costing::DEFAULT_Q_FACTOR_PERCENT;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Menu category for organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    /// Starters
    Appetizer,
    /// Nigiri and other sushi
    Sushi,
    /// Sliced raw fish
    Sashimi,
    /// Maki and hand rolls
    Roll,
    /// Desserts
    Dessert,
    /// Drinks
    Beverage,
    /// Anything else, including prep components
    #[default]
    Other,
}

impl RecipeCategory {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Appetizer => "appetizer",
            Self::Sushi => "sushi",
            Self::Sashimi => "sashimi",
            Self::Roll => "roll",
            Self::Dessert => "dessert",
            Self::Beverage => "beverage",
            Self::Other => "other",
        }
    }

    /// Parse from database string representation; unknown values read as `Other`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for RecipeCategory {
    type Err = AppError;

    /// Strict parse for caller-supplied values
    fn from_str(s: &str) -> AppResult<Self> {
        let category = match s.trim().to_ascii_lowercase().as_str() {
            "appetizer" => Self::Appetizer,
            "sushi" => Self::Sushi,
            "sashimi" => Self::Sashimi,
            "roll" => Self::Roll,
            "dessert" => Self::Dessert,
            "beverage" => Self::Beverage,
            "other" => Self::Other,
            _ => {
                return Err(AppError::invalid_input(format!(
                    "Unknown recipe category '{s}'"
                )))
            }
        };
        Ok(category)
    }
}

const fn default_servings() -> i32 {
    1
}

const fn default_q_factor() -> f64 {
    DEFAULT_Q_FACTOR_PERCENT
}

const fn default_active() -> bool {
    true
}

/// A recipe; its costs are derived on read and never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: RecipeId,
    /// Display name
    pub name: String,
    /// Menu category
    #[serde(default)]
    pub category: RecipeCategory,
    /// Number of servings the recipe yields; values `<= 0` price as 1
    pub servings: i32,
    /// Waste/overhead surcharge percentage (0-100)
    pub q_factor_percent: f64,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time_minutes: u32,
    /// Ordered preparation steps
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Free-text notes or description
    #[serde(default)]
    pub notes: Option<String>,
    /// Inactive recipes stay priceable but are hidden from active listings
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// One ingredient or sub-recipe usage supplied with a recipe write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLineInput {
    /// Ingredient reference
    #[serde(default)]
    pub ingredient_id: Option<IngredientId>,
    /// Sub-recipe reference; quantity is servings of the sub-recipe consumed
    #[serde(default)]
    pub sub_recipe_id: Option<RecipeId>,
    /// Quantity used, must be positive
    pub quantity: f64,
    /// Unit of measure for this usage
    pub unit: String,
    /// Optional preparation note
    #[serde(default)]
    pub note: Option<String>,
}

impl RecipeLineInput {
    /// Validate one line against its parent recipe
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the failed constraint
    pub fn validate(&self, parent: Option<RecipeId>) -> AppResult<()> {
        let target = LinkTarget::from_parts(self.ingredient_id, self.sub_recipe_id)?;
        if let (LinkTarget::SubRecipe(child), Some(parent)) = (target, parent) {
            if child == parent {
                return Err(AppError::invalid_input(format!(
                    "recipe {parent} cannot use itself as a sub-recipe"
                )));
            }
        }
        require_positive("quantity", self.quantity)?;
        require_name("unit", &self.unit)
    }

    /// Build the persisted link for a parent recipe
    #[must_use]
    pub fn into_link(self, parent: RecipeId) -> Link {
        Link {
            id: super::ids::LinkId::new(),
            parent_recipe_id: parent,
            ingredient_id: self.ingredient_id,
            child_recipe_id: self.sub_recipe_id,
            quantity: self.quantity,
            unit: self.unit.trim().to_owned(),
            note: self.note,
        }
    }
}

/// Request to create a recipe together with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    /// Display name
    pub name: String,
    /// Menu category
    #[serde(default)]
    pub category: RecipeCategory,
    /// Servings yielded, must be positive
    #[serde(default = "default_servings")]
    pub servings: i32,
    /// Q-Factor percentage, defaults to 10
    #[serde(default = "default_q_factor")]
    pub q_factor_percent: f64,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time_minutes: u32,
    /// Ordered preparation steps
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Notes or description
    #[serde(default)]
    pub notes: Option<String>,
    /// Active flag, defaults to true
    #[serde(default = "default_active")]
    pub active: bool,
    /// Ingredient and sub-recipe lines
    #[serde(default)]
    pub lines: Vec<RecipeLineInput>,
}

impl CreateRecipeRequest {
    /// Validate write-boundary constraints including every nested line
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the failed constraint
    pub fn validate(&self) -> AppResult<()> {
        require_name("name", &self.name)?;
        require_servings(self.servings)?;
        require_q_factor(self.q_factor_percent)?;
        for line in &self.lines {
            line.validate(None)?;
        }
        Ok(())
    }

    /// Split into the recipe record and its links
    #[must_use]
    pub fn into_records(self) -> (Recipe, Vec<Link>) {
        let now = Utc::now();
        let recipe = Recipe {
            id: RecipeId::new(),
            name: self.name.trim().to_owned(),
            category: self.category,
            servings: self.servings,
            q_factor_percent: self.q_factor_percent,
            prep_time_minutes: self.prep_time_minutes,
            instructions: self.instructions,
            notes: self.notes,
            active: self.active,
            created_at: now,
            updated_at: now,
        };
        let links = self
            .lines
            .into_iter()
            .map(|line| line.into_link(recipe.id))
            .collect();
        (recipe, links)
    }
}

/// Partial update of a recipe; `lines`, when present, replaces every link
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    /// New display name
    pub name: Option<String>,
    /// New category
    pub category: Option<RecipeCategory>,
    /// New servings
    pub servings: Option<i32>,
    /// New Q-Factor percentage
    pub q_factor_percent: Option<f64>,
    /// New preparation time
    pub prep_time_minutes: Option<u32>,
    /// Replacement instruction list
    pub instructions: Option<Vec<String>>,
    /// New notes
    pub notes: Option<String>,
    /// New active flag
    pub active: Option<bool>,
    /// Replacement line list
    pub lines: Option<Vec<RecipeLineInput>>,
}

impl UpdateRecipeRequest {
    /// Validate the supplied fields
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the failed constraint
    pub fn validate(&self, recipe_id: RecipeId) -> AppResult<()> {
        if let Some(name) = &self.name {
            require_name("name", name)?;
        }
        if let Some(servings) = self.servings {
            require_servings(servings)?;
        }
        if let Some(q) = self.q_factor_percent {
            require_q_factor(q)?;
        }
        for line in self.lines.iter().flatten() {
            line.validate(Some(recipe_id))?;
        }
        Ok(())
    }

    /// Apply the scalar fields and return the replacement lines, if any
    pub fn apply_to(self, recipe: &mut Recipe) -> Option<Vec<RecipeLineInput>> {
        if let Some(name) = self.name {
            recipe.name = name.trim().to_owned();
        }
        if let Some(category) = self.category {
            recipe.category = category;
        }
        if let Some(servings) = self.servings {
            recipe.servings = servings;
        }
        if let Some(q) = self.q_factor_percent {
            recipe.q_factor_percent = q;
        }
        if let Some(prep) = self.prep_time_minutes {
            recipe.prep_time_minutes = prep;
        }
        if let Some(instructions) = self.instructions {
            recipe.instructions = instructions;
        }
        if self.notes.is_some() {
            recipe.notes = self.notes;
        }
        if let Some(active) = self.active {
            recipe.active = active;
        }
        recipe.updated_at = Utc::now();
        self.lines
    }
}

/// Filter options for listing recipes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeListFilter {
    /// Only recipes in this category
    pub category: Option<RecipeCategory>,
    /// Exclude inactive recipes
    #[serde(default)]
    pub active_only: bool,
    /// Case-insensitive name substring
    pub search: Option<String>,
}

impl RecipeListFilter {
    /// Whether a recipe passes every configured criterion
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if self.active_only && !recipe.active {
            return false;
        }
        if self.category.is_some_and(|c| c != recipe.category) {
            return false;
        }
        self.search.as_deref().map_or(true, |needle| {
            recipe
                .name
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        })
    }
}
