//! Tag service — flat, normalized tags with idempotent creation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_database::repositories::TagRepository;
use studyhub_entity::tag::{normalize_name, Tag};

/// Manages the tag vocabulary.
#[derive(Debug, Clone)]
pub struct TagService {
    /// Tag repository.
    tag_repo: Arc<TagRepository>,
}

impl TagService {
    /// Creates a new tag service.
    pub fn new(tag_repo: Arc<TagRepository>) -> Self {
        Self { tag_repo }
    }

    /// Lists tags in name order, optionally filtered by a case-insensitive
    /// substring search.
    pub async fn list(&self, search: Option<&str>, limit: i64) -> AppResult<Vec<Tag>> {
        self.tag_repo.find_all(search, limit).await
    }

    /// Fetches one tag.
    pub async fn get(&self, id: Uuid) -> AppResult<Tag> {
        self.tag_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Tag not found"))
    }

    /// Creates a tag from a raw name. Idempotent: when the normalized name
    /// already exists, the existing tag is returned unchanged.
    pub async fn create(&self, raw_name: &str) -> AppResult<Tag> {
        let name = normalize_name(raw_name);
        if name.is_empty() {
            return Err(AppError::validation("Tag name cannot be empty"));
        }

        let tag = self.tag_repo.create_or_get(&name).await?;

        info!(tag_id = %tag.id, name = %tag.name, "Tag resolved");

        Ok(tag)
    }

    /// Renames a tag. Colliding with a different tag's name is a Conflict.
    pub async fn update(&self, id: Uuid, raw_name: &str) -> AppResult<Tag> {
        self.get(id).await?;

        let name = normalize_name(raw_name);
        if name.is_empty() {
            return Err(AppError::validation("Tag name cannot be empty"));
        }

        let tag = self.tag_repo.update(id, &name).await?;

        info!(tag_id = %id, name = %tag.name, "Tag renamed");

        Ok(tag)
    }

    /// Deletes a tag, refusing while resources still carry it.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.get(id).await?;

        let resource_count = self.tag_repo.count_usage(id).await?;
        if resource_count > 0 {
            return Err(AppError::conflict(format!(
                "Cannot delete tag used by {resource_count} resources. \
                 Please remove the tag from resources first."
            )));
        }

        if !self.tag_repo.delete(id).await? {
            return Err(AppError::not_found("Tag not found"));
        }

        info!(tag_id = %id, "Tag deleted");

        Ok(())
    }

    /// Resolves a batch of raw names into tags, creating the missing ones.
    /// Names empty after normalization are dropped; duplicates collapse.
    pub async fn bulk_create(&self, raw_names: &[String]) -> AppResult<Vec<Tag>> {
        let mut seen = HashSet::new();
        let names: Vec<String> = raw_names
            .iter()
            .map(|raw| normalize_name(raw))
            .filter(|name| !name.is_empty() && seen.insert(name.clone()))
            .collect();

        if names.is_empty() {
            return Err(AppError::validation("At least one valid tag name is required"));
        }

        let mut tags = Vec::with_capacity(names.len());
        for name in &names {
            tags.push(self.tag_repo.create_or_get(name).await?);
        }

        info!(count = tags.len(), "Bulk tag resolution completed");

        Ok(tags)
    }
}
