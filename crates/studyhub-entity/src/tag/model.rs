//! Tag entity model and name normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A flat label attachable to any number of resources.
///
/// Tag names are stored normalized; see [`normalize_name`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    /// Unique tag identifier.
    pub id: Uuid,
    /// Unique normalized tag name.
    pub name: String,
    /// When the tag was created.
    pub created_at: DateTime<Utc>,
}

/// Normalize a raw tag name: trim surrounding whitespace and lowercase.
///
/// Every code path that accepts tag names (tag creation, tag rename, bulk
/// creation, and the tag lists on resource create/update) must pass input
/// through this function before touching the database, so `"  Python "` and
/// `"python"` always land on the same row.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}
