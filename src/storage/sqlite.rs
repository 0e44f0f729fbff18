// ABOUTME: SQLite record store for ingredients, recipes, and recipe links using sqlx
// ABOUTME: Creates its schema on open and returns links in insertion (rowid) order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

use super::{RecipeWrite, RecordStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{
    Ingredient, IngredientId, IngredientOrigin, Link, LinkId, Recipe, RecipeCategory, RecipeId,
};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, info};

/// Connections kept for a file-backed database
const FILE_POOL_SIZE: u32 = 5;

/// `SQLite`-backed record store
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open (creating if needed) the database at `database_url` and run migrations
    ///
    /// `sqlite::memory:` URLs get a single connection so every query sees
    /// the same in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema creation fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_url = if in_memory || database_url.contains("mode=") {
            database_url.to_owned()
        } else {
            format!("{database_url}?mode=rwc")
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { FILE_POOL_SIZE })
            .connect(&connection_url)
            .await
            .map_err(|e| {
                AppError::backend_unavailable(format!("Failed to open {database_url}: {e}"))
            })?;

        let store = Self { pool };
        store.migrate().await?;
        info!(url = %database_url, "SQLite record store ready");
        Ok(store)
    }

    /// Wrap an existing pool without running migrations
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.create_ingredients_table().await?;
        self.create_recipes_table().await?;
        self.create_recipe_links_table().await?;
        debug!("Record store schema verified");
        Ok(())
    }

    async fn create_ingredients_table(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                unit TEXT NOT NULL,
                unit_cost REAL NOT NULL CHECK (unit_cost >= 0),
                origin TEXT NOT NULL DEFAULT 'manual',
                external_product_name TEXT,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredients table: {e}")))?;
        Ok(())
    }

    async fn create_recipes_table(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'other',
                servings INTEGER NOT NULL DEFAULT 1,
                q_factor_percent REAL NOT NULL DEFAULT 10,
                prep_time_minutes INTEGER NOT NULL DEFAULT 0,
                instructions TEXT NOT NULL DEFAULT '[]',
                notes TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipes table: {e}")))?;
        Ok(())
    }

    async fn create_recipe_links_table(&self) -> AppResult<()> {
        // No foreign keys: dangling references are priced as unresolved lines
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_links (
                id TEXT PRIMARY KEY,
                parent_recipe_id TEXT NOT NULL,
                ingredient_id TEXT,
                child_recipe_id TEXT,
                quantity REAL NOT NULL,
                unit TEXT NOT NULL,
                note TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe_links table: {e}")))?;
        Ok(())
    }

    async fn insert_recipe<'e, E>(executor: E, recipe: &Recipe) -> AppResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let instructions = serde_json::to_string(&recipe.instructions)?;
        sqlx::query(
            r"
            INSERT INTO recipes (
                id, name, category, servings, q_factor_percent, prep_time_minutes,
                instructions, notes, active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(recipe.id.to_string())
        .bind(&recipe.name)
        .bind(recipe.category.as_str())
        .bind(i64::from(recipe.servings))
        .bind(recipe.q_factor_percent)
        .bind(i64::from(recipe.prep_time_minutes))
        .bind(&instructions)
        .bind(&recipe.notes)
        .bind(i64::from(recipe.active))
        .bind(recipe.created_at.to_rfc3339())
        .bind(recipe.updated_at.to_rfc3339())
        .execute(executor)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;
        Ok(())
    }

    async fn overwrite_recipe<'e, E>(executor: E, recipe: &Recipe) -> AppResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let instructions = serde_json::to_string(&recipe.instructions)?;
        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = $2, category = $3, servings = $4, q_factor_percent = $5,
                prep_time_minutes = $6, instructions = $7, notes = $8, active = $9,
                updated_at = $10
            WHERE id = $1
            ",
        )
        .bind(recipe.id.to_string())
        .bind(&recipe.name)
        .bind(recipe.category.as_str())
        .bind(i64::from(recipe.servings))
        .bind(recipe.q_factor_percent)
        .bind(i64::from(recipe.prep_time_minutes))
        .bind(&instructions)
        .bind(&recipe.notes)
        .bind(i64::from(recipe.active))
        .bind(recipe.updated_at.to_rfc3339())
        .execute(executor)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Recipe {}", recipe.id)));
        }
        Ok(())
    }

    async fn insert_link<'e, E>(executor: E, link: &Link) -> AppResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r"
            INSERT INTO recipe_links (
                id, parent_recipe_id, ingredient_id, child_recipe_id, quantity, unit, note
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(link.id.to_string())
        .bind(link.parent_recipe_id.to_string())
        .bind(link.ingredient_id.map(|id| id.to_string()))
        .bind(link.child_recipe_id.map(|id| id.to_string()))
        .bind(link.quantity)
        .bind(&link.unit)
        .bind(&link.note)
        .execute(executor)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert link {}: {e}", link.id)))?;
        Ok(())
    }
}

fn parse_id<T: FromStr>(raw: &str, what: &str) -> AppResult<T>
where
    T::Err: Display,
{
    T::from_str(raw).map_err(|e| AppError::internal(format!("Invalid {what} id '{raw}': {e}")))
}

fn parse_optional_id<T: FromStr>(raw: Option<String>, what: &str) -> AppResult<Option<T>>
where
    T::Err: Display,
{
    raw.filter(|s| !s.is_empty())
        .map(|s| parse_id(&s, what))
        .transpose()
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))
}

/// Convert a database row to an Ingredient
fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    let id: String = row.get("id");
    let origin: String = row.get("origin");
    let updated_at: String = row.get("updated_at");

    Ok(Ingredient {
        id: parse_id(&id, "ingredient")?,
        name: row.get("name"),
        unit: row.get("unit"),
        unit_cost: row.get("unit_cost"),
        origin: IngredientOrigin::parse(&origin),
        external_product_name: row.get("external_product_name"),
        updated_at: parse_timestamp(&updated_at)?,
    })
}

/// Convert a database row to a Recipe
fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let id: String = row.get("id");
    let category: String = row.get("category");
    let instructions_json: String = row.get("instructions");
    let servings: i64 = row.get("servings");
    let prep_time: i64 = row.get("prep_time_minutes");
    let active: i64 = row.get("active");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Recipe {
        id: parse_id(&id, "recipe")?,
        name: row.get("name"),
        category: RecipeCategory::parse(&category),
        servings: i32::try_from(servings).unwrap_or(1),
        q_factor_percent: row.get("q_factor_percent"),
        prep_time_minutes: u32::try_from(prep_time).unwrap_or(0),
        instructions: serde_json::from_str(&instructions_json)?,
        notes: row.get("notes"),
        active: active == 1,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

/// Convert a database row to a Link
fn row_to_link(row: &SqliteRow) -> AppResult<Link> {
    let id: String = row.get("id");
    let parent: String = row.get("parent_recipe_id");

    Ok(Link {
        id: parse_id(&id, "link")?,
        parent_recipe_id: parse_id(&parent, "recipe")?,
        ingredient_id: parse_optional_id(row.get("ingredient_id"), "ingredient")?,
        child_recipe_id: parse_optional_id(row.get("child_recipe_id"), "recipe")?,
        quantity: row.get("quantity"),
        unit: row.get("unit"),
        note: row.get("note"),
    })
}

const INGREDIENT_COLUMNS: &str =
    "id, name, unit, unit_cost, origin, external_product_name, updated_at";
const RECIPE_COLUMNS: &str = "id, name, category, servings, q_factor_percent, \
     prep_time_minutes, instructions, notes, active, created_at, updated_at";
const LINK_COLUMNS: &str =
    "id, parent_recipe_id, ingredient_id, child_recipe_id, quantity, unit, note";

#[async_trait]
impl RecordStore for SqliteRecordStore {
    fn backend_info(&self) -> &'static str {
        "SQLite (embedded)"
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::backend_unavailable(format!("SQLite health check failed: {e}")))?;
        Ok(())
    }

    async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        rows.iter().map(row_to_ingredient).collect()
    }

    async fn get_ingredient(&self, id: IngredientId) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE id = $1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient {id}: {e}")))?;

        row.map(|r| row_to_ingredient(&r)).transpose()
    }

    async fn create_ingredient(&self, ingredient: &Ingredient) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO ingredients (
                id, name, unit, unit_cost, origin, external_product_name, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(ingredient.id.to_string())
        .bind(&ingredient.name)
        .bind(&ingredient.unit)
        .bind(ingredient.unit_cost)
        .bind(ingredient.origin.as_str())
        .bind(&ingredient.external_product_name)
        .bind(ingredient.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredient: {e}")))?;
        Ok(())
    }

    async fn update_ingredient(&self, ingredient: &Ingredient) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE ingredients
            SET name = $2, unit = $3, unit_cost = $4, origin = $5,
                external_product_name = $6, updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(ingredient.id.to_string())
        .bind(&ingredient.name)
        .bind(&ingredient.unit)
        .bind(ingredient.unit_cost)
        .bind(ingredient.origin.as_str())
        .bind(&ingredient.external_product_name)
        .bind(ingredient.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update ingredient: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Ingredient {}", ingredient.id)));
        }
        Ok(())
    }

    async fn delete_ingredient(&self, id: IngredientId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete ingredient: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY name COLLATE NOCASE"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    async fn get_recipe(&self, id: RecipeId) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe {id}: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    async fn create_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        Self::insert_recipe(&self.pool, recipe).await
    }

    async fn save_recipe(
        &self,
        recipe: &Recipe,
        links: Option<&[Link]>,
        write: RecipeWrite,
    ) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        match write {
            RecipeWrite::Create => Self::insert_recipe(&mut *tx, recipe).await?,
            RecipeWrite::Update => Self::overwrite_recipe(&mut *tx, recipe).await?,
        }

        if let Some(links) = links {
            sqlx::query("DELETE FROM recipe_links WHERE parent_recipe_id = $1")
                .bind(recipe.id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to clear recipe links: {e}")))?;

            for link in links {
                Self::insert_link(&mut *tx, link).await?;
            }
        }

        // Dropping an uncommitted transaction rolls it back
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe save: {e}")))?;
        debug!(recipe_id = %recipe.id, ?write, "Recipe saved");
        Ok(())
    }

    async fn delete_recipe(&self, id: RecipeId) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("DELETE FROM recipe_links WHERE parent_recipe_id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe links: {e}")))?;

        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe delete: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_links(&self) -> AppResult<Vec<Link>> {
        let rows = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM recipe_links ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list links: {e}")))?;

        rows.iter().map(row_to_link).collect()
    }

    async fn get_link(&self, id: LinkId) -> AppResult<Option<Link>> {
        let row = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM recipe_links WHERE id = $1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get link {id}: {e}")))?;

        row.map(|r| row_to_link(&r)).transpose()
    }

    async fn create_link(&self, link: &Link) -> AppResult<()> {
        Self::insert_link(&self.pool, link).await
    }

    async fn update_link(&self, link: &Link) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE recipe_links
            SET quantity = $2, unit = $3, note = $4
            WHERE id = $1
            ",
        )
        .bind(link.id.to_string())
        .bind(link.quantity)
        .bind(&link.unit)
        .bind(&link.note)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update link: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Link {}", link.id)));
        }
        Ok(())
    }

    async fn delete_link(&self, id: LinkId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipe_links WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete link: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}
