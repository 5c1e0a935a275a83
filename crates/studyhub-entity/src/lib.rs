//! # studyhub-entity
//!
//! Domain entity models for Morita StudyHub. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod bookmark;
pub mod category;
pub mod resource;
pub mod tag;
pub mod user;
