//! # studyhub-storage
//!
//! File store implementation for StudyHub. Uploaded bytes live on the local
//! filesystem under a configurable root; the catalog only ever sees
//! store-relative paths.

pub mod local;

pub use local::LocalFileStore;
