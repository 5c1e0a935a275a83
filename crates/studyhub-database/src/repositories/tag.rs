//! Tag repository implementation.
//!
//! All names handed to this repository are expected to be normalized
//! already (see `studyhub_entity::tag::normalize_name`).

use sqlx::PgPool;
use uuid::Uuid;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_entity::tag::Tag;

/// Repository for tag CRUD and usage queries.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    /// Create a new tag repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a tag by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tag by id", e))
    }

    /// Find a tag by its normalized name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find tag by name", e)
            })
    }

    /// List tags in name order, optionally filtered by a substring search.
    pub async fn find_all(&self, search: Option<&str>, limit: i64) -> AppResult<Vec<Tag>> {
        let pattern = search.map(|s| format!("%{s}%"));
        sqlx::query_as::<_, Tag>(
            "SELECT * FROM tags WHERE ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY name ASC LIMIT $2",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tags", e))
    }

    /// Insert a tag, or return the existing row when the name is taken.
    ///
    /// The conditional insert makes this idempotent even under concurrent
    /// callers racing on the same name.
    pub async fn create_or_get(&self, name: &str) -> AppResult<Tag> {
        let inserted = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name) VALUES ($1) ON CONFLICT (name) DO NOTHING RETURNING *",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create tag", e))?;

        match inserted {
            Some(tag) => Ok(tag),
            None => self
                .find_by_name(name)
                .await?
                .ok_or_else(|| AppError::database(format!("Tag '{name}' vanished during insert"))),
        }
    }

    /// Rename a tag.
    pub async fn update(&self, id: Uuid, name: &str) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>("UPDATE tags SET name = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("tags_name_key") =>
                {
                    AppError::conflict("Tag with this name already exists")
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to update tag", e),
            })?
            .ok_or_else(|| AppError::not_found(format!("Tag {id} not found")))
    }

    /// Delete a tag. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete tag", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the resources a tag is attached to.
    pub async fn count_usage(&self, id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM resource_tags WHERE tag_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count tag usage", e))
    }
}
