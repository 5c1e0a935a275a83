//! Route definitions for the StudyHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Headroom on top of the configured upload cap; multipart framing adds a
/// few hundred bytes, and the precise cap is enforced once the file part
/// has been read.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.storage.max_upload_size_bytes as usize + MULTIPART_OVERHEAD_BYTES;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(resource_routes())
        .merge(category_routes())
        .merge(tag_routes())
        .merge(bookmark_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Auth endpoints: register, token, login, me, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/token", post(handlers::auth::token))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// User self-service endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::get_profile))
        .route("/users/me", put(handlers::user::update_profile))
        .route(
            "/users/me/change-password",
            post(handlers::user::change_password),
        )
        .route("/users/me/stats", get(handlers::user::stats))
        .route("/users/me/resources", get(handlers::user::my_resources))
        .route(
            "/users/me/recent-activity",
            get(handlers::user::recent_activity),
        )
}

/// Resource catalog: search, link registration, upload, download
fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/resources", get(handlers::resource::list))
        .route("/resources", post(handlers::resource::create))
        .route("/resources/upload", post(handlers::resource::upload))
        .route("/resources/{id}", get(handlers::resource::get))
        .route("/resources/{id}", put(handlers::resource::update))
        .route("/resources/{id}", delete(handlers::resource::delete))
        .route(
            "/resources/{id}/download",
            get(handlers::resource::download),
        )
}

/// Category tree CRUD and per-category resource listings
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(handlers::category::list))
        .route("/categories", post(handlers::category::create))
        .route("/categories/{id}", get(handlers::category::get))
        .route("/categories/{id}", put(handlers::category::update))
        .route("/categories/{id}", delete(handlers::category::delete))
        .route(
            "/categories/{id}/resources",
            get(handlers::category::resources),
        )
}

/// Tag CRUD, bulk creation, and per-tag resource listings
fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/tags", get(handlers::tag::list))
        .route("/tags", post(handlers::tag::create))
        .route("/tags/bulk", post(handlers::tag::bulk_create))
        .route("/tags/{id}", get(handlers::tag::get))
        .route("/tags/{id}", put(handlers::tag::update))
        .route("/tags/{id}", delete(handlers::tag::delete))
        .route("/tags/{id}/resources", get(handlers::tag::resources))
}

/// Bookmark CRUD plus toggle, check, and stats
fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(handlers::bookmark::list))
        .route("/bookmarks", post(handlers::bookmark::create))
        .route("/bookmarks/stats", get(handlers::bookmark::stats))
        .route("/bookmarks/{id}", get(handlers::bookmark::get))
        .route("/bookmarks/{id}", delete(handlers::bookmark::delete))
        .route(
            "/bookmarks/resource/{resource_id}",
            delete(handlers::bookmark::delete_by_resource),
        )
        .route(
            "/bookmarks/check/{resource_id}",
            get(handlers::bookmark::check),
        )
        .route(
            "/bookmarks/toggle/{resource_id}",
            post(handlers::bookmark::toggle),
        )
}

/// Health check endpoint (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
