//! Resource repository implementation.
//!
//! Association replacement (categories/tags) runs inside a transaction with
//! the owning row mutation, so a request either lands completely or not at
//! all. Unknown category/tag ids in an attach list are skipped silently by
//! the `SELECT … WHERE id = ANY($n)` insert form.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::types::pagination::{Page, PageRequest};
use studyhub_entity::category::Category;
use studyhub_entity::resource::{CreateResource, Resource, ResourceType, UpdateResource};
use studyhub_entity::tag::Tag;

/// Filters for the resource catalog listing.
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    /// Case-insensitive substring matched against title or description.
    pub query: Option<String>,
    /// Restrict to resources attached to any of these categories.
    pub category_ids: Option<Vec<Uuid>>,
    /// Restrict to resources attached to any of these tags.
    pub tag_ids: Option<Vec<Uuid>>,
    /// Restrict to one resource type.
    pub resource_type: Option<ResourceType>,
}

/// A category row joined with the resource it is attached to.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryLink {
    /// The resource this category is attached to.
    pub resource_id: Uuid,
    /// The attached category.
    #[sqlx(flatten)]
    pub category: Category,
}

/// A tag row joined with the resource it is attached to.
#[derive(Debug, Clone, FromRow)]
pub struct TagLink {
    /// The resource this tag is attached to.
    pub resource_id: Uuid,
    /// The attached tag.
    #[sqlx(flatten)]
    pub tag: Tag,
}

/// Repository for resource CRUD, filtering, and association management.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a resource by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find resource by id", e)
            })
    }

    /// Find the resources matching a set of ids.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Resource>> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find resources by ids", e)
            })
    }

    /// List resources newest-first with the full filter matrix.
    pub async fn list(&self, filter: &ResourceFilter, page: &PageRequest) -> AppResult<Page<Resource>> {
        let pattern = filter.query.as_ref().map(|q| format!("%{q}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM resources r \
             WHERE ($1::text IS NULL OR r.title ILIKE $1 OR r.description ILIKE $1) \
               AND ($2::uuid[] IS NULL OR EXISTS (SELECT 1 FROM resource_categories rc \
                    WHERE rc.resource_id = r.id AND rc.category_id = ANY($2))) \
               AND ($3::uuid[] IS NULL OR EXISTS (SELECT 1 FROM resource_tags rt \
                    WHERE rt.resource_id = r.id AND rt.tag_id = ANY($3))) \
               AND ($4::resource_type IS NULL OR r.resource_type = $4)",
        )
        .bind(&pattern)
        .bind(filter.category_ids.as_ref())
        .bind(filter.tag_ids.as_ref())
        .bind(filter.resource_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count resources", e))?;

        let resources = sqlx::query_as::<_, Resource>(
            "SELECT r.* FROM resources r \
             WHERE ($1::text IS NULL OR r.title ILIKE $1 OR r.description ILIKE $1) \
               AND ($2::uuid[] IS NULL OR EXISTS (SELECT 1 FROM resource_categories rc \
                    WHERE rc.resource_id = r.id AND rc.category_id = ANY($2))) \
               AND ($3::uuid[] IS NULL OR EXISTS (SELECT 1 FROM resource_tags rt \
                    WHERE rt.resource_id = r.id AND rt.tag_id = ANY($3))) \
               AND ($4::resource_type IS NULL OR r.resource_type = $4) \
             ORDER BY r.created_at DESC LIMIT $5 OFFSET $6",
        )
        .bind(&pattern)
        .bind(filter.category_ids.as_ref())
        .bind(filter.tag_ids.as_ref())
        .bind(filter.resource_type)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list resources", e))?;

        Ok(Page::new(resources, total, page))
    }

    /// List the resources attached to a category, newest-first.
    pub async fn find_by_category(
        &self,
        category_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<Page<Resource>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM resource_categories WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count category resources", e)
                })?;

        let resources = sqlx::query_as::<_, Resource>(
            "SELECT r.* FROM resources r \
             JOIN resource_categories rc ON rc.resource_id = r.id \
             WHERE rc.category_id = $1 \
             ORDER BY r.created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(category_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list category resources", e)
        })?;

        Ok(Page::new(resources, total, page))
    }

    /// List the resources attached to a tag, newest-first.
    pub async fn find_by_tag(&self, tag_id: Uuid, page: &PageRequest) -> AppResult<Page<Resource>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM resource_tags WHERE tag_id = $1")
                .bind(tag_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count tag resources", e)
                })?;

        let resources = sqlx::query_as::<_, Resource>(
            "SELECT r.* FROM resources r \
             JOIN resource_tags rt ON rt.resource_id = r.id \
             WHERE rt.tag_id = $1 \
             ORDER BY r.created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(tag_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list tag resources", e)
        })?;

        Ok(Page::new(resources, total, page))
    }

    /// List a user's uploads, newest-first.
    pub async fn find_by_uploader(
        &self,
        uploader_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<Page<Resource>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM resources WHERE uploader_id = $1")
                .bind(uploader_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count uploads", e)
                })?;

        let resources = sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources WHERE uploader_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(uploader_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list uploads", e))?;

        Ok(Page::new(resources, total, page))
    }

    /// A user's most recent uploads.
    pub async fn recent_by_uploader(
        &self,
        uploader_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<Resource>> {
        sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources WHERE uploader_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(uploader_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list recent uploads", e))
    }

    /// Count a user's uploads.
    pub async fn count_by_uploader(&self, uploader_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM resources WHERE uploader_id = $1")
            .bind(uploader_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count uploads", e))
    }

    /// Count a user's uploads of one type.
    pub async fn count_by_uploader_of_type(
        &self,
        uploader_id: Uuid,
        resource_type: ResourceType,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM resources WHERE uploader_id = $1 AND resource_type = $2",
        )
        .bind(uploader_id)
        .bind(resource_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count uploads by type", e)
        })
    }

    /// Create a resource and attach its categories and tags in one
    /// transaction.
    pub async fn create(
        &self,
        data: &CreateResource,
        category_ids: &[Uuid],
        tag_ids: &[Uuid],
    ) -> AppResult<Resource> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let resource = sqlx::query_as::<_, Resource>(
            "INSERT INTO resources (title, description, resource_type, file_path, url, \
                                    file_size, mime_type, uploader_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.resource_type)
        .bind(&data.file_path)
        .bind(&data.url)
        .bind(data.file_size)
        .bind(&data.mime_type)
        .bind(data.uploader_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create resource", e))?;

        if !category_ids.is_empty() {
            sqlx::query(
                "INSERT INTO resource_categories (resource_id, category_id) \
                 SELECT $1, id FROM categories WHERE id = ANY($2)",
            )
            .bind(resource.id)
            .bind(category_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to attach categories", e)
            })?;
        }

        if !tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO resource_tags (resource_id, tag_id) \
                 SELECT $1, id FROM tags WHERE id = ANY($2)",
            )
            .bind(resource.id)
            .bind(tag_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to attach tags", e))?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit resource create", e)
        })?;

        Ok(resource)
    }

    /// Update a resource's scalar fields and optionally replace its
    /// association sets, all in one transaction. A `Some` association list
    /// (even an empty one) fully replaces the current set.
    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateResource,
        category_ids: Option<&[Uuid]>,
        tag_ids: Option<&[Uuid]>,
    ) -> AppResult<Resource> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let resource = sqlx::query_as::<_, Resource>(
            "UPDATE resources SET title = COALESCE($2, title), \
                                  description = COALESCE($3, description), \
                                  updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update resource", e))?
        .ok_or_else(|| AppError::not_found(format!("Resource {id} not found")))?;

        if let Some(ids) = category_ids {
            sqlx::query("DELETE FROM resource_categories WHERE resource_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to clear categories", e)
                })?;
            if !ids.is_empty() {
                sqlx::query(
                    "INSERT INTO resource_categories (resource_id, category_id) \
                     SELECT $1, id FROM categories WHERE id = ANY($2)",
                )
                .bind(id)
                .bind(ids)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to attach categories", e)
                })?;
            }
        }

        if let Some(ids) = tag_ids {
            sqlx::query("DELETE FROM resource_tags WHERE resource_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to clear tags", e)
                })?;
            if !ids.is_empty() {
                sqlx::query(
                    "INSERT INTO resource_tags (resource_id, tag_id) \
                     SELECT $1, id FROM tags WHERE id = ANY($2)",
                )
                .bind(id)
                .bind(ids)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to attach tags", e)
                })?;
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit resource update", e)
        })?;

        Ok(resource)
    }

    /// Delete a resource. Junction rows and bookmarks cascade. Returns
    /// whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete resource", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Categories attached to any of the given resources, for page
    /// hydration.
    pub async fn categories_for(&self, resource_ids: &[Uuid]) -> AppResult<Vec<CategoryLink>> {
        sqlx::query_as::<_, CategoryLink>(
            "SELECT rc.resource_id, c.id, c.name, c.description, c.parent_id, c.created_at \
             FROM resource_categories rc \
             JOIN categories c ON c.id = rc.category_id \
             WHERE rc.resource_id = ANY($1) \
             ORDER BY c.name ASC",
        )
        .bind(resource_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load resource categories", e)
        })
    }

    /// Tags attached to any of the given resources, for page hydration.
    pub async fn tags_for(&self, resource_ids: &[Uuid]) -> AppResult<Vec<TagLink>> {
        sqlx::query_as::<_, TagLink>(
            "SELECT rt.resource_id, t.id, t.name, t.created_at \
             FROM resource_tags rt \
             JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.resource_id = ANY($1) \
             ORDER BY t.name ASC",
        )
        .bind(resource_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load resource tags", e))
    }
}
