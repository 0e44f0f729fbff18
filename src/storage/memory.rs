// ABOUTME: In-memory record store holding ingredients, recipes, and links behind one lock
// ABOUTME: Preserves link insertion order so duplicate merging stays deterministic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use super::{RecipeWrite, RecordStore};
use async_trait::async_trait;
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{Ingredient, IngredientId, Link, LinkId, Recipe, RecipeId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    links: Vec<Link>,
}

/// Record store kept entirely in process memory
///
/// Vectors rather than maps keep insertion order, which the link
/// deduplicator relies on.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRecordStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a link without write-boundary validation
    ///
    /// Backends in the field can hold malformed or self-referencing links;
    /// this lets tests reproduce them.
    pub async fn insert_raw_link(&self, link: Link) {
        self.tables.write().await.links.push(link);
    }
}

fn replace_by<T>(items: &mut [T], item: &T, same: impl Fn(&T) -> bool, what: &str) -> AppResult<()>
where
    T: Clone,
{
    let slot = items
        .iter_mut()
        .find(|existing| same(existing))
        .ok_or_else(|| AppError::not_found(what))?;
    *slot = item.clone();
    Ok(())
}

fn remove_by<T>(items: &mut Vec<T>, same: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|existing| !same(existing));
    items.len() != before
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn backend_info(&self) -> &'static str {
        "In-memory (ephemeral)"
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        Ok(self.tables.read().await.ingredients.clone())
    }

    async fn get_ingredient(&self, id: IngredientId) -> AppResult<Option<Ingredient>> {
        Ok(self
            .tables
            .read()
            .await
            .ingredients
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn create_ingredient(&self, ingredient: &Ingredient) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.ingredients.iter().any(|i| i.id == ingredient.id) {
            return Err(AppError::already_exists(format!(
                "Ingredient {}",
                ingredient.id
            )));
        }
        tables.ingredients.push(ingredient.clone());
        Ok(())
    }

    async fn update_ingredient(&self, ingredient: &Ingredient) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        replace_by(
            &mut tables.ingredients,
            ingredient,
            |i| i.id == ingredient.id,
            &format!("Ingredient {}", ingredient.id),
        )
    }

    async fn delete_ingredient(&self, id: IngredientId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove_by(&mut tables.ingredients, |i| i.id == id))
    }

    async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let mut recipes = self.tables.read().await.recipes.clone();
        recipes.sort_by_key(|r| r.name.to_lowercase());
        Ok(recipes)
    }

    async fn get_recipe(&self, id: RecipeId) -> AppResult<Option<Recipe>> {
        Ok(self
            .tables
            .read()
            .await
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn create_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.recipes.iter().any(|r| r.id == recipe.id) {
            return Err(AppError::already_exists(format!("Recipe {}", recipe.id)));
        }
        tables.recipes.push(recipe.clone());
        Ok(())
    }

    async fn save_recipe(
        &self,
        recipe: &Recipe,
        links: Option<&[Link]>,
        write: RecipeWrite,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        // Every check runs before the first mutation so a rejected save leaves no trace
        let slot = tables.recipes.iter().position(|r| r.id == recipe.id);
        match (write, slot) {
            (RecipeWrite::Create, Some(_)) => {
                return Err(AppError::already_exists(format!("Recipe {}", recipe.id)));
            }
            (RecipeWrite::Update, None) => {
                return Err(AppError::not_found(format!("Recipe {}", recipe.id)));
            }
            _ => {}
        }
        if let Some(links) = links {
            let mut seen = HashSet::new();
            for link in links {
                let taken = tables
                    .links
                    .iter()
                    .any(|l| l.id == link.id && l.parent_recipe_id != recipe.id);
                if taken || !seen.insert(link.id) {
                    return Err(AppError::already_exists(format!("Link {}", link.id)));
                }
            }
        }

        match slot.and_then(|index| tables.recipes.get_mut(index)) {
            Some(existing) => *existing = recipe.clone(),
            None => tables.recipes.push(recipe.clone()),
        }
        if let Some(links) = links {
            tables.links.retain(|l| l.parent_recipe_id != recipe.id);
            tables.links.extend(links.iter().cloned());
        }
        Ok(())
    }

    async fn delete_recipe(&self, id: RecipeId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let existed = remove_by(&mut tables.recipes, |r| r.id == id);
        if existed {
            tables.links.retain(|l| l.parent_recipe_id != id);
        }
        Ok(existed)
    }

    async fn list_links(&self) -> AppResult<Vec<Link>> {
        Ok(self.tables.read().await.links.clone())
    }

    async fn get_link(&self, id: LinkId) -> AppResult<Option<Link>> {
        Ok(self
            .tables
            .read()
            .await
            .links
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn create_link(&self, link: &Link) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.links.iter().any(|l| l.id == link.id) {
            return Err(AppError::already_exists(format!("Link {}", link.id)));
        }
        tables.links.push(link.clone());
        Ok(())
    }

    async fn update_link(&self, link: &Link) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        replace_by(
            &mut tables.links,
            link,
            |l| l.id == link.id,
            &format!("Link {}", link.id),
        )
    }

    async fn delete_link(&self, id: LinkId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove_by(&mut tables.links, |l| l.id == id))
    }
}
