// ABOUTME: Immutable snapshot of the ingredient and link collections with lookup indexes
// ABOUTME: Built once per refresh and shared by Arc so readers never see a partial update
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use chrono::{DateTime, Utc};
use recipe_core::models::{Ingredient, IngredientId, Link, RecipeId};
use std::collections::HashMap;

/// Ingredients and links as fetched in one refresh
///
/// The ingredient index and the per-parent link index are built here, once,
/// so resolution never scans the collections per lookup.
#[derive(Debug, Clone)]
pub struct RecordSnapshot {
    ingredients: Vec<Ingredient>,
    links: Vec<Link>,
    ingredient_index: HashMap<IngredientId, usize>,
    links_by_parent: HashMap<RecipeId, Vec<usize>>,
    fetched_at: DateTime<Utc>,
}

impl RecordSnapshot {
    /// Index freshly fetched collections
    #[must_use]
    pub fn new(ingredients: Vec<Ingredient>, links: Vec<Link>) -> Self {
        let ingredient_index = ingredients
            .iter()
            .enumerate()
            .map(|(position, ingredient)| (ingredient.id, position))
            .collect();

        let mut links_by_parent: HashMap<RecipeId, Vec<usize>> = HashMap::new();
        for (position, link) in links.iter().enumerate() {
            links_by_parent
                .entry(link.parent_recipe_id)
                .or_default()
                .push(position);
        }

        Self {
            ingredients,
            links,
            ingredient_index,
            links_by_parent,
            fetched_at: Utc::now(),
        }
    }

    /// Snapshot with no records, served when nothing has ever been fetched
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Every cached ingredient
    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Every cached link, in backend order
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Ingredient by identifier
    #[must_use]
    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredient_index
            .get(&id)
            .and_then(|&position| self.ingredients.get(position))
    }

    /// Links owned by one recipe, in backend order
    pub fn links_for(&self, parent: RecipeId) -> impl Iterator<Item = &Link> {
        self.links_by_parent
            .get(&parent)
            .into_iter()
            .flatten()
            .filter_map(|&position| self.links.get(position))
    }

    /// When the collections were fetched
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::models::{IngredientOrigin, LinkId};

    fn ingredient(name: &str) -> Ingredient {
        Ingredient {
            id: IngredientId::new(),
            name: name.to_owned(),
            unit: "oz".to_owned(),
            unit_cost: 1.0,
            origin: IngredientOrigin::Manual,
            external_product_name: None,
            updated_at: Utc::now(),
        }
    }

    fn link(parent: RecipeId, ingredient: IngredientId) -> Link {
        Link {
            id: LinkId::new(),
            parent_recipe_id: parent,
            ingredient_id: Some(ingredient),
            child_recipe_id: None,
            quantity: 1.0,
            unit: "oz".to_owned(),
            note: None,
        }
    }

    #[test]
    fn test_indexes_ingredients_and_links() {
        let rice = ingredient("rice");
        let nori = ingredient("nori");
        let roll = RecipeId::new();
        let other = RecipeId::new();
        let links = vec![link(roll, rice.id), link(other, nori.id), link(roll, nori.id)];
        let snapshot = RecordSnapshot::new(vec![rice.clone(), nori.clone()], links);

        assert_eq!(snapshot.ingredient(nori.id).map(|i| i.name.as_str()), Some("nori"));
        let roll_links: Vec<_> = snapshot.links_for(roll).collect();
        assert_eq!(roll_links.len(), 2);
        assert_eq!(roll_links[0].ingredient_id, Some(rice.id));
        assert_eq!(roll_links[1].ingredient_id, Some(nori.id));
        assert_eq!(snapshot.links_for(RecipeId::new()).count(), 0);
    }
}
