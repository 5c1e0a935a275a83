//! Bookmark entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's bookmark on a resource.
///
/// At most one bookmark exists per (user, resource) pair; the database
/// enforces this with a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bookmark {
    /// Unique bookmark identifier.
    pub id: Uuid,
    /// The bookmarking user.
    pub user_id: Uuid,
    /// The bookmarked resource.
    pub resource_id: Uuid,
    /// When the bookmark was created.
    pub created_at: DateTime<Utc>,
}
