//! Error types for catalog loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors during effect catalog loading
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read catalog directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid effect definition in {path}: {reason}")]
    InvalidDefinition { path: PathBuf, reason: String },
}
