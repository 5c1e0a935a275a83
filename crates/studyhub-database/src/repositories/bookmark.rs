//! Bookmark repository implementation.
//!
//! Every query is scoped by the owning user: bookmarks are private, so a
//! caller can never read or delete another user's rows through this
//! repository.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_entity::bookmark::Bookmark;

/// Per-user bookmark counts, split by resource type.
#[derive(Debug, Clone, Copy, FromRow, serde::Serialize)]
pub struct BookmarkStats {
    /// Total bookmarks.
    pub total: i64,
    /// Bookmarks pointing at FILE resources.
    pub files: i64,
    /// Bookmarks pointing at LINK resources.
    pub links: i64,
}

/// A recent bookmark joined with its resource title, for activity feeds.
#[derive(Debug, Clone, FromRow)]
pub struct BookmarkActivity {
    /// Bookmark identifier.
    pub id: Uuid,
    /// The bookmarked resource.
    pub resource_id: Uuid,
    /// Title of the bookmarked resource.
    pub title: String,
    /// When the bookmark was created.
    pub created_at: DateTime<Utc>,
}

/// Repository for bookmark CRUD and statistics.
#[derive(Debug, Clone)]
pub struct BookmarkRepository {
    pool: PgPool,
}

impl BookmarkRepository {
    /// Create a new bookmark repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a bookmark by primary key, scoped to its owner.
    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Bookmark>> {
        sqlx::query_as::<_, Bookmark>("SELECT * FROM bookmarks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find bookmark by id", e)
            })
    }

    /// Find the bookmark a user holds on a resource, if any.
    pub async fn find_by_pair(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
    ) -> AppResult<Option<Bookmark>> {
        sqlx::query_as::<_, Bookmark>(
            "SELECT * FROM bookmarks WHERE user_id = $1 AND resource_id = $2",
        )
        .bind(user_id)
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find bookmark", e))
    }

    /// List a user's bookmarks, newest-first.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Bookmark>> {
        sqlx::query_as::<_, Bookmark>(
            "SELECT * FROM bookmarks WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookmarks", e))
    }

    /// Insert a bookmark. Returns `None` when the (user, resource) pair is
    /// already bookmarked — the unique constraint closes the race, so a
    /// concurrent duplicate can never produce two rows.
    pub async fn create(&self, user_id: Uuid, resource_id: Uuid) -> AppResult<Option<Bookmark>> {
        sqlx::query_as::<_, Bookmark>(
            "INSERT INTO bookmarks (user_id, resource_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, resource_id) DO NOTHING \
             RETURNING *",
        )
        .bind(user_id)
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create bookmark", e))
    }

    /// Delete a bookmark by id, scoped to its owner. Returns whether a row
    /// was removed.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete bookmark", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user's bookmark on a resource. Returns whether a row was
    /// removed.
    pub async fn delete_by_pair(&self, user_id: Uuid, resource_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND resource_id = $2")
            .bind(user_id)
            .bind(resource_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete bookmark", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a user's bookmarks, split by the bookmarked resource's type.
    pub async fn stats(&self, user_id: Uuid) -> AppResult<BookmarkStats> {
        sqlx::query_as::<_, BookmarkStats>(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE r.resource_type = 'FILE') AS files, \
                    COUNT(*) FILTER (WHERE r.resource_type = 'LINK') AS links \
             FROM bookmarks b \
             JOIN resources r ON r.id = b.resource_id \
             WHERE b.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load bookmark stats", e))
    }

    /// Count a user's bookmarks.
    pub async fn count_by_user(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookmarks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count bookmarks", e)
            })
    }

    /// A user's most recent bookmarks with the bookmarked resource titles.
    pub async fn recent_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<BookmarkActivity>> {
        sqlx::query_as::<_, BookmarkActivity>(
            "SELECT b.id, b.resource_id, r.title, b.created_at \
             FROM bookmarks b \
             JOIN resources r ON r.id = b.resource_id \
             WHERE b.user_id = $1 \
             ORDER BY b.created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list recent bookmarks", e)
        })
    }
}
