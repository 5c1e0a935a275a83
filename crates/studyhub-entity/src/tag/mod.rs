//! Tag domain entities.

pub mod model;

pub use model::{normalize_name, Tag};
