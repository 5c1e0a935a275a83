//! HTTP request handlers, organized by domain.

pub mod auth;
pub mod bookmark;
pub mod category;
pub mod health;
pub mod resource;
pub mod tag;
pub mod user;
