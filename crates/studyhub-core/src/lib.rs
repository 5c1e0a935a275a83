//! # studyhub-core
//!
//! Core crate for Morita StudyHub. Contains configuration schemas, the
//! storage collaborator trait, pagination types, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other StudyHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
