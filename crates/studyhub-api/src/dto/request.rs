//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use studyhub_entity::resource::ResourceType;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login email.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Plaintext password; the full policy is enforced by the service.
    pub password: String,
    /// Given name.
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
}

/// JSON login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Password.
    pub password: String,
}

/// OAuth2-style form login. The `username` field carries the email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenForm {
    /// Email, under the conventional form field name.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Profile update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New email.
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// The password currently on the account.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// LINK resource registration body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateResourceRequest {
    /// Resource title.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Must be LINK; files go through the upload endpoint.
    pub resource_type: ResourceType,
    /// External URL.
    pub url: Option<String>,
    /// Categories to attach.
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    /// Raw tag names.
    #[serde(default)]
    pub tag_names: Vec<String>,
}

/// Resource update body. A present `category_ids` / `tag_names` (even
/// empty) fully replaces that association set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateResourceRequest {
    /// New title.
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement category set.
    pub category_ids: Option<Vec<Uuid>>,
    /// Replacement tag set, as raw names.
    pub tag_names: Option<Vec<String>>,
}

/// Resource list filters. Id sets are comma-separated in the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceListParams {
    /// Case-insensitive substring match on title or description.
    pub query: Option<String>,
    /// Comma-separated category ids.
    pub category_ids: Option<String>,
    /// Comma-separated tag ids.
    pub tag_ids: Option<String>,
    /// Restrict to FILE or LINK.
    pub resource_type: Option<ResourceType>,
}

/// Category creation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Category name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional parent category.
    pub parent_id: Option<Uuid>,
}

/// Category update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    /// New name.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New parent.
    pub parent_id: Option<Uuid>,
}

/// Tag name carried as a query parameter on create/rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagNameParams {
    /// Raw tag name; normalized by the service.
    pub tag_name: String,
}

/// Tag list filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagListParams {
    /// Case-insensitive substring match on the tag name.
    pub search: Option<String>,
    /// Maximum tags to return (default 100).
    pub limit: Option<i64>,
}

/// Bookmark creation body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookmarkRequest {
    /// The resource to bookmark.
    pub resource_id: Uuid,
}

/// Activity feed parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityParams {
    /// Maximum entries to return (default 10).
    pub limit: Option<i64>,
}
