//! Error types for loading the tool dataset.

use std::path::PathBuf;

/// Errors raised while loading the tool dataset.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The dataset file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dataset file is not valid tool JSON.
    #[error("invalid tool data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two records share the same id.
    #[error("duplicate tool id: {0}")]
    DuplicateId(String),
}
