//! Category tree handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use studyhub_entity::category::Category;
use studyhub_service::taxonomy::{CategoryPatch, NewCategory};

use crate::dto::request::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::dto::response::ResourceListResponse;
use crate::error::{ApiError, validation_error};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.category_service.list().await?;
    Ok(Json(categories))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let category = state
        .category_service
        .create(NewCategory {
            name: payload.name,
            description: payload.description,
            parent_id: payload.parent_id,
        })
        .await?;

    Ok(Json(category))
}

/// GET /api/categories/{id}
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, ApiError> {
    let category = state.category_service.get(id).await?;
    Ok(Json(category))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let category = state
        .category_service
        .update(
            id,
            CategoryPatch {
                name: payload.name,
                description: payload.description,
                parent_id: payload.parent_id,
            },
        )
        .await?;

    Ok(Json(category))
}

/// DELETE /api/categories/{id}
///
/// Refused while resources or child categories still reference it.
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.category_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/categories/{id}/resources
pub async fn resources(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ResourceListResponse>, ApiError> {
    let page = pagination.into_page_request();
    let resources = state.catalog_service.list_by_category(id, &page).await?;

    Ok(Json(ResourceListResponse::from(resources)))
}
