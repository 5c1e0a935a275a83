//! # studyhub-auth
//!
//! The credential engine for Morita StudyHub.
//!
//! ## Modules
//!
//! - `jwt` — JWT token creation and validation
//! - `password` — Argon2id password hashing and policy enforcement

pub mod jwt;
pub mod password;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
