// Error types for the catalog and the session layer.
// The binary wraps these in anyhow; the library keeps them typed so callers
// can tell an aborted prompt from a failed write.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file exists but could not be read
    #[error("failed to read catalog file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not a valid name -> {rate} JSON object
    #[error("failed to parse catalog file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write catalog file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("tree name must not be empty")]
    EmptyName,

    /// Rate input was not a finite number
    #[error("invalid absorption rate: {0:?}")]
    InvalidRate(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Tree name not present in the catalog
    #[error("unknown tree: {0}")]
    UnknownTree(String),

    /// User cancelled or left the name prompt empty
    #[error("registration aborted")]
    Aborted,

    /// Catalog fell back to the defaults; saving would clobber the file
    #[error("not saving over {path:?}: it could not be loaded ({reason})")]
    UnsafeOverwrite { path: PathBuf, reason: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
