//! Resource entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::resource_type::ResourceType;

/// A learning resource in the catalog.
///
/// FILE resources carry `file_path`/`file_size`/`mime_type`; LINK resources
/// carry `url`. The type never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: Uuid,
    /// Resource title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Whether this is an uploaded file or an external link.
    pub resource_type: ResourceType,
    /// Store-relative path of the uploaded bytes (FILE only).
    pub file_path: Option<String>,
    /// External URL (LINK only).
    pub url: Option<String>,
    /// Size of the uploaded bytes (FILE only).
    pub file_size: Option<i64>,
    /// Declared MIME type of the uploaded bytes (FILE only).
    pub mime_type: Option<String>,
    /// The user who registered this resource.
    pub uploader_id: Uuid,
    /// When the resource was created.
    pub created_at: DateTime<Utc>,
    /// When the resource was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource {
    /// Check whether this resource holds uploaded bytes.
    pub fn is_file(&self) -> bool {
        self.resource_type == ResourceType::File
    }
}

/// Data required to create a new resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResource {
    /// Resource title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// FILE or LINK.
    pub resource_type: ResourceType,
    /// Stored path (FILE only).
    pub file_path: Option<String>,
    /// External URL (LINK only).
    pub url: Option<String>,
    /// Stored size (FILE only).
    pub file_size: Option<i64>,
    /// Declared MIME type (FILE only).
    pub mime_type: Option<String>,
    /// Owning user.
    pub uploader_id: Uuid,
}

/// Scalar fields of a resource update. `None` fields are left unchanged;
/// association replacement is carried separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateResource {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
}
