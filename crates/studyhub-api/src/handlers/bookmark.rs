//! Bookmark handlers. Every route operates on the caller's own bookmarks.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use studyhub_service::bookmark::{
    BookmarkCheck, BookmarkDetail, BookmarkStatsView, BookmarkToggle,
};

use crate::dto::request::CreateBookmarkRequest;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/bookmarks
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<BookmarkDetail>>, ApiError> {
    let page = pagination.into_page_request();
    let bookmarks = state
        .bookmark_service
        .list(auth.context(), page.limit, page.offset)
        .await?;

    Ok(Json(bookmarks))
}

/// POST /api/bookmarks
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBookmarkRequest>,
) -> Result<Json<BookmarkDetail>, ApiError> {
    let bookmark = state
        .bookmark_service
        .create(auth.context(), payload.resource_id)
        .await?;

    Ok(Json(bookmark))
}

/// GET /api/bookmarks/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<BookmarkStatsView>, ApiError> {
    let stats = state.bookmark_service.stats(auth.context()).await?;
    Ok(Json(stats))
}

/// GET /api/bookmarks/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookmarkDetail>, ApiError> {
    let bookmark = state.bookmark_service.get(auth.context(), id).await?;
    Ok(Json(bookmark))
}

/// DELETE /api/bookmarks/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.bookmark_service.delete(auth.context(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/bookmarks/resource/{resource_id}
///
/// Removes the caller's bookmark addressed by the resource it points at.
pub async fn delete_by_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(resource_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .bookmark_service
        .delete_by_resource(auth.context(), resource_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/bookmarks/check/{resource_id}
pub async fn check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(resource_id): Path<Uuid>,
) -> Result<Json<BookmarkCheck>, ApiError> {
    let status = state.bookmark_service.check(auth.context(), resource_id).await?;
    Ok(Json(status))
}

/// POST /api/bookmarks/toggle/{resource_id}
pub async fn toggle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(resource_id): Path<Uuid>,
) -> Result<Json<BookmarkToggle>, ApiError> {
    let result = state.bookmark_service.toggle(auth.context(), resource_id).await?;
    Ok(Json(result))
}
