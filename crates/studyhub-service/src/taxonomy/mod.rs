//! Taxonomy services — hierarchical categories and flat normalized tags.

pub mod category;
pub mod tag;

pub use category::{CategoryPatch, CategoryService, NewCategory};
pub use tag::TagService;
