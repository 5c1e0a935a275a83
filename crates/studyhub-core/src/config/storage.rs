//! File storage configuration.

use serde::{Deserialize, Serialize};

/// Local file storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for uploaded file content.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Maximum upload size in bytes (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}
