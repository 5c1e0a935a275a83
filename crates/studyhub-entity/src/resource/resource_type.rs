//! Resource type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a catalog resource, fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceType {
    /// Uploaded bytes held by the file store.
    File,
    /// An external URL.
    Link,
}

impl ResourceType {
    /// Return the type as its uppercase wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Link => "LINK",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = studyhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FILE" => Ok(Self::File),
            "LINK" => Ok(Self::Link),
            _ => Err(studyhub_core::AppError::validation(format!(
                "Invalid resource type: '{s}'. Expected one of: FILE, LINK"
            ))),
        }
    }
}
