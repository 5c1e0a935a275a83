//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use studyhub_core::types::pagination::PageRequest;

/// `limit` / `offset` query parameters for paginated endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Maximum items to return (default 20, clamped to 1..=100).
    pub limit: Option<i64>,
    /// Items to skip (default 0).
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Converts to a clamped `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.limit.unwrap_or(20), self.offset.unwrap_or(0))
    }
}
