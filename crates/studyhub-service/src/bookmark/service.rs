//! Bookmark service — per-user saved resources with a toggle flow.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_database::repositories::{BookmarkRepository, ResourceRepository};
use studyhub_entity::bookmark::Bookmark;

use crate::catalog::{CatalogService, ResourceDetail};
use crate::context::RequestContext;

/// A bookmark joined with its hydrated resource.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BookmarkDetail {
    /// The bookmark row, flattened into the top level.
    #[serde(flatten)]
    pub bookmark: Bookmark,
    /// The bookmarked resource with full details.
    pub resource: ResourceDetail,
}

/// Whether a resource is bookmarked by the caller.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct BookmarkCheck {
    /// True when a bookmark exists.
    pub bookmarked: bool,
    /// The bookmark's id, when one exists.
    pub bookmark_id: Option<Uuid>,
}

/// Outcome of a bookmark toggle.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct BookmarkToggle {
    /// State after the toggle.
    pub bookmarked: bool,
    /// `"added"` or `"removed"`.
    pub action: &'static str,
    /// The bookmark's id after an add; omitted after a removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark_id: Option<Uuid>,
    /// Human-readable outcome.
    pub message: &'static str,
}

/// The caller's bookmark counters, split by resource type.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct BookmarkStatsView {
    /// All bookmarks.
    pub total_bookmarks: i64,
    /// Bookmarks on FILE resources.
    pub file_bookmarks: i64,
    /// Bookmarks on LINK resources.
    pub link_bookmarks: i64,
}

/// Manages per-user bookmarks.
#[derive(Debug, Clone)]
pub struct BookmarkService {
    /// Bookmark repository.
    bookmark_repo: Arc<BookmarkRepository>,
    /// Resource repository, for existence checks and hydration input.
    resource_repo: Arc<ResourceRepository>,
    /// Catalog service, for resource hydration.
    catalog: Arc<CatalogService>,
}

impl BookmarkService {
    /// Creates a new bookmark service.
    pub fn new(
        bookmark_repo: Arc<BookmarkRepository>,
        resource_repo: Arc<ResourceRepository>,
        catalog: Arc<CatalogService>,
    ) -> Self {
        Self {
            bookmark_repo,
            resource_repo,
            catalog,
        }
    }

    /// Lists the caller's bookmarks newest-first, each with its hydrated
    /// resource.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<BookmarkDetail>> {
        let bookmarks = self.bookmark_repo.find_by_user(ctx.user_id, limit, offset).await?;
        self.attach_resources(bookmarks).await
    }

    /// Bookmarks a resource for the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        resource_id: Uuid,
    ) -> AppResult<BookmarkDetail> {
        let resource = self
            .resource_repo
            .find_by_id(resource_id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;

        let bookmark = self
            .bookmark_repo
            .create(ctx.user_id, resource_id)
            .await?
            .ok_or_else(|| AppError::conflict("Resource is already bookmarked"))?;

        info!(user_id = %ctx.user_id, resource_id = %resource_id, "Bookmark added");

        let resource = self.catalog.hydrate(resource).await?;
        Ok(BookmarkDetail { bookmark, resource })
    }

    /// Fetches one of the caller's bookmarks.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<BookmarkDetail> {
        let bookmark = self
            .bookmark_repo
            .find_by_id(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Bookmark not found"))?;

        let resource = self
            .resource_repo
            .find_by_id(bookmark.resource_id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;

        let resource = self.catalog.hydrate(resource).await?;
        Ok(BookmarkDetail { bookmark, resource })
    }

    /// Removes one of the caller's bookmarks by bookmark id.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !self.bookmark_repo.delete(id, ctx.user_id).await? {
            return Err(AppError::not_found("Bookmark not found"));
        }

        info!(user_id = %ctx.user_id, bookmark_id = %id, "Bookmark removed");

        Ok(())
    }

    /// Removes the caller's bookmark on a resource, addressed by resource id.
    pub async fn delete_by_resource(
        &self,
        ctx: &RequestContext,
        resource_id: Uuid,
    ) -> AppResult<()> {
        if !self.bookmark_repo.delete_by_pair(ctx.user_id, resource_id).await? {
            return Err(AppError::not_found("Bookmark not found"));
        }

        info!(user_id = %ctx.user_id, resource_id = %resource_id, "Bookmark removed");

        Ok(())
    }

    /// Reports whether the caller has bookmarked a resource.
    pub async fn check(
        &self,
        ctx: &RequestContext,
        resource_id: Uuid,
    ) -> AppResult<BookmarkCheck> {
        let bookmark = self.bookmark_repo.find_by_pair(ctx.user_id, resource_id).await?;
        Ok(BookmarkCheck {
            bookmarked: bookmark.is_some(),
            bookmark_id: bookmark.map(|b| b.id),
        })
    }

    /// Toggles the caller's bookmark on a resource.
    ///
    /// The conditional insert closes the add/add race: whichever caller
    /// loses the race still observes the bookmark as added.
    pub async fn toggle(
        &self,
        ctx: &RequestContext,
        resource_id: Uuid,
    ) -> AppResult<BookmarkToggle> {
        self.resource_repo
            .find_by_id(resource_id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;

        if let Some(existing) = self.bookmark_repo.find_by_pair(ctx.user_id, resource_id).await? {
            self.bookmark_repo.delete(existing.id, ctx.user_id).await?;

            info!(user_id = %ctx.user_id, resource_id = %resource_id, "Bookmark toggled off");

            return Ok(BookmarkToggle {
                bookmarked: false,
                action: "removed",
                bookmark_id: None,
                message: "Bookmark removed",
            });
        }

        let bookmark = match self.bookmark_repo.create(ctx.user_id, resource_id).await? {
            Some(bookmark) => bookmark,
            // Lost an add/add race; the pair exists now.
            None => self
                .bookmark_repo
                .find_by_pair(ctx.user_id, resource_id)
                .await?
                .ok_or_else(|| AppError::database("Bookmark vanished during toggle"))?,
        };

        info!(user_id = %ctx.user_id, resource_id = %resource_id, "Bookmark toggled on");

        Ok(BookmarkToggle {
            bookmarked: true,
            action: "added",
            bookmark_id: Some(bookmark.id),
            message: "Bookmark added",
        })
    }

    /// Gathers the caller's bookmark counters.
    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<BookmarkStatsView> {
        let stats = self.bookmark_repo.stats(ctx.user_id).await?;
        Ok(BookmarkStatsView {
            total_bookmarks: stats.total,
            file_bookmarks: stats.files,
            link_bookmarks: stats.links,
        })
    }

    /// Joins bookmarks with their hydrated resources, preserving bookmark
    /// order. A bookmark whose resource vanished mid-flight is skipped.
    async fn attach_resources(&self, bookmarks: Vec<Bookmark>) -> AppResult<Vec<BookmarkDetail>> {
        if bookmarks.is_empty() {
            return Ok(Vec::new());
        }

        let resource_ids: Vec<Uuid> = bookmarks.iter().map(|b| b.resource_id).collect();
        let resources = self.resource_repo.find_by_ids(&resource_ids).await?;
        let details = self.catalog.hydrate_many(resources).await?;
        let mut by_id: HashMap<Uuid, ResourceDetail> =
            details.into_iter().map(|d| (d.resource.id, d)).collect();

        Ok(bookmarks
            .into_iter()
            .filter_map(|bookmark| {
                by_id.remove(&bookmark.resource_id).map(|resource| BookmarkDetail {
                    bookmark,
                    resource,
                })
            })
            .collect())
    }
}
