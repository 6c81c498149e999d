// ABOUTME: Error types for variable file loading
// ABOUTME: Every variant carries the path of the file that failed

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read variable file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML variable file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse HCL variable file {}: {source}", path.display())]
    Hcl {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("Failed to parse JSON variable file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid variable file {}: {reason}", path.display())]
    InvalidFormat { path: PathBuf, reason: String },
}

impl LoadError {
    /// Path of the variable file that failed to load
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Yaml { path, .. }
            | LoadError::Hcl { path, .. }
            | LoadError::Json { path, .. }
            | LoadError::InvalidFormat { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
