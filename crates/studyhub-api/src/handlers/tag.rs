//! Tag handlers.
//!
//! Tag names travel as the `tag_name` query parameter on create and
//! rename, and bulk creation takes a bare JSON array of names.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use studyhub_entity::tag::Tag;

use crate::dto::request::{TagListParams, TagNameParams};
use crate::dto::response::ResourceListResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Default page size for tag listings.
const DEFAULT_TAG_LIMIT: i64 = 100;

/// GET /api/tags
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<TagListParams>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_TAG_LIMIT);
    let tags = state.tag_service.list(params.search.as_deref(), limit).await?;

    Ok(Json(tags))
}

/// POST /api/tags
///
/// Idempotent: resolving a name that already exists returns the existing
/// tag instead of failing.
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<TagNameParams>,
) -> Result<Json<Tag>, ApiError> {
    let tag = state.tag_service.create(&params.tag_name).await?;
    Ok(Json(tag))
}

/// GET /api/tags/{id}
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Tag>, ApiError> {
    let tag = state.tag_service.get(id).await?;
    Ok(Json(tag))
}

/// PUT /api/tags/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<TagNameParams>,
) -> Result<Json<Tag>, ApiError> {
    let tag = state.tag_service.update(id, &params.tag_name).await?;
    Ok(Json(tag))
}

/// DELETE /api/tags/{id}
///
/// Refused while resources still carry the tag.
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tag_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/tags/bulk
pub async fn bulk_create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(names): Json<Vec<String>>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = state.tag_service.bulk_create(&names).await?;
    Ok(Json(tags))
}

/// GET /api/tags/{id}/resources
pub async fn resources(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ResourceListResponse>, ApiError> {
    let page = pagination.into_page_request();
    let resources = state.catalog_service.list_by_tag(id, &page).await?;

    Ok(Json(ResourceListResponse::from(resources)))
}
