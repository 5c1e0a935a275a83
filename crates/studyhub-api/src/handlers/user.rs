//! Profile and account handlers under /users/me.

use axum::Json;
use axum::extract::{Query, State};
use validator::Validate;

use studyhub_entity::user::{UpdateUser, User};
use studyhub_service::user::UserStats;

use crate::dto::request::{ActivityParams, ChangePasswordRequest, UpdateProfileRequest};
use crate::dto::response::{ActivityResponse, MessageResponse, ResourceListResponse};
use crate::error::{ApiError, validation_error};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Default number of activity entries when the client does not ask for a
/// specific count.
const DEFAULT_ACTIVITY_LIMIT: i64 = 10;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = state.user_service.get_profile(auth.context()).await?;
    Ok(Json(user))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let user = state
        .user_service
        .update_profile(
            auth.context(),
            UpdateUser {
                email: payload.email,
                first_name: payload.first_name,
                last_name: payload.last_name,
            },
        )
        .await?;

    Ok(Json(user))
}

/// POST /api/users/me/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .user_service
        .change_password(auth.context(), &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// GET /api/users/me/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserStats>, ApiError> {
    let stats = state.user_service.stats(auth.context()).await?;
    Ok(Json(stats))
}

/// GET /api/users/me/resources
pub async fn my_resources(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ResourceListResponse>, ApiError> {
    let page = pagination.into_page_request();
    let resources = state
        .catalog_service
        .list_by_uploader(auth.context().user_id, &page)
        .await?;

    Ok(Json(ResourceListResponse::from(resources)))
}

/// GET /api/users/me/recent-activity
pub async fn recent_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ActivityParams>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    let activities = state.user_service.recent_activity(auth.context(), limit).await?;

    Ok(Json(ActivityResponse { activities }))
}
