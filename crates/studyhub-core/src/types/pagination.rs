//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default number of items per page.
const DEFAULT_LIMIT: i64 = 20;
/// Maximum number of items per page.
const MAX_LIMIT: i64 = 100;

/// Request parameters for paginated queries.
///
/// The API speaks limit/offset directly, so these map 1:1 onto the SQL
/// `LIMIT` and `OFFSET` clauses after clamping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: i64,
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of results together with the total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total: i64,
    /// The limit this page was fetched with.
    pub limit: i64,
    /// The offset this page was fetched with.
    pub offset: i64,
    /// Whether more items exist beyond this page.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a page from fetched items and the total match count.
    pub fn new(items: Vec<T>, total: i64, request: &PageRequest) -> Self {
        Self {
            items,
            total,
            limit: request.limit,
            offset: request.offset,
            has_more: request.offset + request.limit < total,
        }
    }

    /// Map the items of this page, keeping the pagination bookkeeping.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
            has_more: self.has_more,
        }
    }
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}
