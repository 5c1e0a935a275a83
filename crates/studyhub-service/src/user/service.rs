//! User self-service operations — profile, password changes, statistics,
//! and the recent-activity feed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use studyhub_auth::password::PasswordHasher;
use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_database::repositories::{BookmarkRepository, ResourceRepository, UserRepository};
use studyhub_entity::resource::ResourceType;
use studyhub_entity::user::{UpdateUser, User};

use crate::context::RequestContext;

/// Counters shown on a user's profile page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserStats {
    /// Resources this user has uploaded or registered.
    pub uploaded_resources: i64,
    /// Bookmarks this user holds.
    pub bookmarks: i64,
    /// Uploads of type FILE.
    pub file_resources: i64,
    /// Uploads of type LINK.
    pub link_resources: i64,
    /// When the account was created.
    pub account_created: DateTime<Utc>,
}

/// One entry in the recent-activity feed.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ActivityEntry {
    /// Entry kind: `"upload"` or `"bookmark"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Human-readable description, e.g. `Uploaded 'Lecture 3'`.
    pub action: String,
    /// When the activity happened.
    pub timestamp: DateTime<Utc>,
    /// The resource the activity refers to.
    pub resource_id: Uuid,
}

/// Handles user self-service operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Resource repository, for upload counters and activity.
    resource_repo: Arc<ResourceRepository>,
    /// Bookmark repository, for bookmark counters and activity.
    bookmark_repo: Arc<BookmarkRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        resource_repo: Arc<ResourceRepository>,
        bookmark_repo: Arc<BookmarkRepository>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            user_repo,
            resource_repo,
            bookmark_repo,
            hasher,
        }
    }

    /// Gets the current user's full profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the current user's profile fields.
    ///
    /// An email change that collides with another account surfaces as the
    /// same Conflict the registration path produces.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        data: UpdateUser,
    ) -> AppResult<User> {
        let user = self.user_repo.update(ctx.user_id, &data).await?;

        info!(user_id = %ctx.user_id, "Profile updated");

        Ok(user)
    }

    /// Changes the current user's password.
    ///
    /// Only the minimum-length rule applies here; the full policy runs at
    /// registration.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.get_profile(ctx).await?;

        let valid = self
            .hasher
            .verify_password(current_password, &user.password_hash)?;
        if !valid {
            return Err(AppError::validation("Current password is incorrect"));
        }

        if new_password.chars().count() < 8 {
            return Err(AppError::validation(
                "New password must be at least 8 characters long",
            ));
        }

        let new_hash = self.hasher.hash_password(new_password)?;
        self.user_repo.update_password(ctx.user_id, &new_hash).await?;

        info!(user_id = %ctx.user_id, "Password changed");

        Ok(())
    }

    /// Gathers the counters shown on the profile page.
    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<UserStats> {
        let user = self.get_profile(ctx).await?;

        let uploaded = self.resource_repo.count_by_uploader(ctx.user_id).await?;
        let bookmarks = self.bookmark_repo.count_by_user(ctx.user_id).await?;
        let files = self
            .resource_repo
            .count_by_uploader_of_type(ctx.user_id, ResourceType::File)
            .await?;
        let links = self
            .resource_repo
            .count_by_uploader_of_type(ctx.user_id, ResourceType::Link)
            .await?;

        Ok(UserStats {
            uploaded_resources: uploaded,
            bookmarks,
            file_resources: files,
            link_resources: links,
            account_created: user.created_at,
        })
    }

    /// Builds the recent-activity feed: the caller's `limit / 2` newest
    /// uploads and `limit / 2` newest bookmarks, merged newest-first and
    /// truncated to `limit`.
    pub async fn recent_activity(
        &self,
        ctx: &RequestContext,
        limit: i64,
    ) -> AppResult<Vec<ActivityEntry>> {
        let limit = limit.max(0);
        let half = limit / 2;

        let uploads = self
            .resource_repo
            .recent_by_uploader(ctx.user_id, half)
            .await?;
        let bookmarks = self.bookmark_repo.recent_by_user(ctx.user_id, half).await?;

        let mut entries: Vec<ActivityEntry> = uploads
            .into_iter()
            .map(|r| ActivityEntry {
                kind: "upload",
                action: format!("Uploaded '{}'", r.title),
                timestamp: r.created_at,
                resource_id: r.id,
            })
            .collect();
        entries.extend(bookmarks.into_iter().map(|b| ActivityEntry {
            kind: "bookmark",
            action: format!("Bookmarked '{}'", b.title),
            timestamp: b.created_at,
            resource_id: b.resource_id,
        }));

        Ok(merge_newest_first(entries, limit as usize))
    }
}

/// Sorts activity entries newest-first and truncates to `limit`.
fn merge_newest_first(mut entries: Vec<ActivityEntry>, limit: usize) -> Vec<ActivityEntry> {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.truncate(limit);
    entries
}
