//! Category entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A node in the hierarchical category tree.
///
/// Names are unique across the whole tree, not per level. A category with
/// `parent_id = None` is a root.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    /// Unique category identifier.
    pub id: Uuid,
    /// Unique category name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Parent category, if this is not a root.
    pub parent_id: Option<Uuid>,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    /// Category name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional parent category.
    pub parent_id: Option<Uuid>,
}

/// Data for updating an existing category. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategory {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New parent category.
    pub parent_id: Option<Uuid>,
}
