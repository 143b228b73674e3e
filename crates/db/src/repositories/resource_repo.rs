//! Repository for the `resources` table.

use resman_core::resource::{contains_pattern, ResourceFilter};
use resman_core::types::DbId;
use sqlx::PgPool;

use crate::models::resource::Resource;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides CRUD operations for resources.
pub struct ResourceRepo;

impl ResourceRepo {
    /// Insert a new resource, returning the created row.
    ///
    /// `created_at` and `updated_at` come from the same `NOW()` and are
    /// therefore equal on the returned row.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
    ) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Find a resource by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = $1");
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List resources matching `filter`, most recently updated first.
    ///
    /// Each non-empty filter field is a case-insensitive literal substring
    /// match; a description filter never matches a NULL description.
    pub async fn list(pool: &PgPool, filter: &ResourceFilter) -> Result<Vec<Resource>, sqlx::Error> {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if filter.name_fragment().is_some() {
            conditions.push(format!("name ILIKE ${bind_idx} ESCAPE '\\'"));
            bind_idx += 1;
        }
        if filter.description_fragment().is_some() {
            conditions.push(format!("description ILIKE ${bind_idx} ESCAPE '\\'"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM resources {where_clause} ORDER BY updated_at DESC, id DESC"
        );

        let mut q = sqlx::query_as::<_, Resource>(&query);
        if let Some(name) = filter.name_fragment() {
            q = q.bind(contains_pattern(name));
        }
        if let Some(description) = filter.description_fragment() {
            q = q.bind(contains_pattern(description));
        }
        q.fetch_all(pool).await
    }

    /// Update a resource. Only non-`None` arguments are applied; a
    /// `Some(None)` description clears the column.
    ///
    /// `updated_at` always moves forward, even if the server clock steps
    /// backwards between writes. Returns `None` if no row with the given
    /// `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        description: Option<Option<&str>>,
    ) -> Result<Option<Resource>, sqlx::Error> {
        let description_provided = description.is_some();
        let description_value = description.flatten();

        let query = format!(
            "UPDATE resources SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .bind(name)
            .bind(description_provided)
            .bind(description_value)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a resource by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
