//! Resource catalog services — listing, link registration, file upload and
//! download, updates, and deletion.

pub mod download;
pub mod service;
pub mod upload;

pub use download::{Download, DownloadService};
pub use service::{CatalogService, NewResource, ResourceDetail, ResourcePatch};
pub use upload::{UploadParams, UploadService};
