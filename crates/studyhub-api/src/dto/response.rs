//! Response DTOs.

use serde::{Deserialize, Serialize};

use studyhub_core::types::pagination::Page;
use studyhub_service::catalog::ResourceDetail;
use studyhub_service::user::ActivityEntry;

/// Issued-token response, OAuth2 shaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed access token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    /// Wraps a signed token in the standard bearer envelope.
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Simple confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Creates a confirmation message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Paginated resource list envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceListResponse {
    /// Resources in this page.
    pub resources: Vec<ResourceDetail>,
    /// Total matching resources.
    pub total: i64,
    /// Requested page size.
    pub limit: i64,
    /// Requested offset.
    pub offset: i64,
    /// Whether more items remain past this page.
    pub has_more: bool,
}

impl From<Page<ResourceDetail>> for ResourceListResponse {
    fn from(page: Page<ResourceDetail>) -> Self {
        Self {
            resources: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
            has_more: page.has_more,
        }
    }
}

/// Recent-activity feed envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityResponse {
    /// Merged activity entries, newest first.
    pub activities: Vec<ActivityEntry>,
}

/// Liveness response with a database ping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: String,
    /// Database reachability: `"connected"` or `"unavailable"`.
    pub database: String,
    /// Crate version.
    pub version: String,
}
