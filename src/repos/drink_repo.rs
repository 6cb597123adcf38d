/*
 * Responsibility
 * - drinks CRUD
 * - `recipe` is stored as JSONB; the typed shape lives in RecipePart so
 *   the handler layer never re-parses raw JSON
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;

use crate::repos::error::RepoError;

/// One ingredient of a recipe, in pour order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePart {
    pub name: String,
    pub color: String,
    pub parts: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: Json<Vec<RecipePart>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn list(pool: &PgPool) -> Result<Vec<DrinkRow>, RepoError> {
    let rows = sqlx::query_as::<_, DrinkRow>(
        r#"
        SELECT id, title, recipe, created_at, updated_at
        FROM drinks
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn create(
    pool: &PgPool,
    title: &str,
    recipe: &[RecipePart],
) -> Result<DrinkRow, RepoError> {
    let row = sqlx::query_as::<_, DrinkRow>(
        r#"
        INSERT INTO drinks (title, recipe)
        VALUES ($1, $2)
        RETURNING id, title, recipe, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(Json(recipe))
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    drink_id: i64,
    title: Option<&str>,
    recipe: Option<&[RecipePart]>,
) -> Result<Option<DrinkRow>, RepoError> {
    let row = sqlx::query_as::<_, DrinkRow>(
        r#"
        UPDATE drinks
        SET
            title = COALESCE($2, title),
            recipe = COALESCE($3, recipe),
            updated_at = now()
        WHERE id = $1
        RETURNING id, title, recipe, created_at, updated_at
        "#,
    )
    .bind(drink_id)
    .bind(title)
    .bind(recipe.map(Json))
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &PgPool, drink_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM drinks
        WHERE id = $1
        "#,
    )
    .bind(drink_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
