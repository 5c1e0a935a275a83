//! Registration, login, and session handlers.

use axum::Json;
use axum::extract::{Form, State};
use validator::Validate;

use studyhub_entity::user::User;
use studyhub_service::auth::RegisterUser;

use crate::dto::request::{LoginRequest, RegisterRequest, TokenForm};
use crate::dto::response::{MessageResponse, TokenResponse};
use crate::error::{ApiError, validation_error};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
///
/// Creates a new account and returns the stored user.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<User>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let user = state
        .auth_service
        .register(RegisterUser {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    Ok(Json(user))
}

/// POST /api/auth/token
///
/// OAuth2-style password grant: accepts form credentials where the
/// `username` field carries the email address.
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (issued, _user) = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(TokenResponse::bearer(issued.token)))
}

/// POST /api/auth/login
///
/// JSON login variant for browser clients.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let (issued, _user) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse::bearer(issued.token)))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<User>, ApiError> {
    let user = state.user_service.get_profile(auth.context()).await?;
    Ok(Json(user))
}

/// POST /api/auth/logout
///
/// Stateless tokens cannot be revoked server-side; clients discard the
/// token and this endpoint confirms the intent.
pub async fn logout(_auth: AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse::new("Successfully logged out"))
}
