//! Core type definitions used across the StudyHub workspace.

pub mod pagination;

pub use pagination::{Page, PageRequest};
