//! Category repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_entity::category::{Category, CreateCategory, UpdateCategory};

/// Repository for category CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a category by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find category by id", e)
            })
    }

    /// List all categories in name order.
    pub async fn find_all(&self) -> AppResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list categories", e))
    }

    /// Find the categories matching a set of ids.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = ANY($1) ORDER BY name ASC",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find categories by ids", e)
        })
    }

    /// Create a new category.
    pub async fn create(&self, data: &CreateCategory) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description, parent_id) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("categories_name_key") =>
            {
                AppError::conflict("Category with this name already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create category", e),
        })
    }

    /// Update a category's fields.
    pub async fn update(&self, id: Uuid, data: &UpdateCategory) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = COALESCE($2, name), \
                                   description = COALESCE($3, description), \
                                   parent_id = COALESCE($4, parent_id) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("categories_name_key") =>
            {
                AppError::conflict("Category with this name already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update category", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))
    }

    /// Delete a category. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete category", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the resources attached to a category.
    pub async fn count_resources(&self, id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM resource_categories WHERE category_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count category resources", e)
            })
    }

    /// Count the direct children of a category.
    pub async fn count_children(&self, id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count child categories", e)
            })
    }
}
