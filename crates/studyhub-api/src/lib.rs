//! # studyhub-api
//!
//! HTTP API layer for StudyHub built on Axum.
//!
//! Provides all REST endpoints, the bearer-token extractor, request/response
//! DTOs, error mapping, and the server bootstrap.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use router::build_router;
pub use state::AppState;
