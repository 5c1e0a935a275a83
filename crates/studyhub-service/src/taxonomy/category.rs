//! Category service — hierarchical taxonomy with guarded deletion.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_database::repositories::CategoryRepository;
use studyhub_entity::category::{Category, CreateCategory, UpdateCategory};

/// Data for creating a category.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewCategory {
    /// Category name. Unique across the whole tree.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional parent category.
    pub parent_id: Option<Uuid>,
}

/// Partial update of a category.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CategoryPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New parent.
    pub parent_id: Option<Uuid>,
}

/// Manages the category hierarchy.
#[derive(Debug, Clone)]
pub struct CategoryService {
    /// Category repository.
    category_repo: Arc<CategoryRepository>,
}

impl CategoryService {
    /// Creates a new category service.
    pub fn new(category_repo: Arc<CategoryRepository>) -> Self {
        Self { category_repo }
    }

    /// Lists all categories in name order.
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.category_repo.find_all().await
    }

    /// Fetches one category.
    pub async fn get(&self, id: Uuid) -> AppResult<Category> {
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    /// Creates a category. The unique name constraint closes the
    /// duplicate-name race.
    pub async fn create(&self, data: NewCategory) -> AppResult<Category> {
        let category = self
            .category_repo
            .create(&CreateCategory {
                name: data.name,
                description: data.description,
                parent_id: data.parent_id,
            })
            .await?;

        info!(category_id = %category.id, name = %category.name, "Category created");

        Ok(category)
    }

    /// Applies a partial update to a category.
    pub async fn update(&self, id: Uuid, patch: CategoryPatch) -> AppResult<Category> {
        self.get(id).await?;

        let category = self
            .category_repo
            .update(
                id,
                &UpdateCategory {
                    name: patch.name,
                    description: patch.description,
                    parent_id: patch.parent_id,
                },
            )
            .await?;

        info!(category_id = %id, "Category updated");

        Ok(category)
    }

    /// Deletes a category, refusing while resources or child categories
    /// still reference it.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.get(id).await?;

        let resource_count = self.category_repo.count_resources(id).await?;
        if resource_count > 0 {
            return Err(AppError::conflict(format!(
                "Cannot delete category with {resource_count} resources. \
                 Please move or delete the resources first."
            )));
        }

        let child_count = self.category_repo.count_children(id).await?;
        if child_count > 0 {
            return Err(AppError::conflict(format!(
                "Cannot delete category with {child_count} child categories. \
                 Please delete child categories first."
            )));
        }

        if !self.category_repo.delete(id).await? {
            return Err(AppError::not_found("Category not found"));
        }

        info!(category_id = %id, "Category deleted");

        Ok(())
    }
}
