//! Error types for the extraction pipeline and catalog layer.
//!
//! Library functions return [`Result<T>`]. Only [`Error::Parse`] is meant to be
//! recovered per file; every other variant is fatal for the operation that
//! produced it and is reported by the CLI layer.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// Source file could not be parsed. Only that file is skipped.
    #[error("Failed to parse {file_path}: {message}")]
    Parse { file_path: String, message: String },

    /// The hash length cap was reached while resolving a short-hash collision.
    #[error("No free key for \"{key}\" within {max_length} hex digits")]
    CollisionExhausted { key: String, max_length: usize },

    /// PO/POT support was not compiled in.
    #[error("Catalog format is unavailable (build with the `catalog` feature)")]
    CatalogFormatUnavailable,

    /// Writing an output artifact failed.
    #[error("Failed to write {artifact} to {}: {source}", path.display())]
    Write {
        artifact: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted catalog could not be parsed.
    #[error("Corrupt catalog {}: {message}", path.display())]
    CorruptCatalog { path: PathBuf, message: String },

    /// A persisted flat dictionary does not have the expected shape.
    #[error("Invalid dictionary: {0}")]
    InvalidDictionary(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A catalog timestamp could not be rendered.
    #[error("Failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl Error {
    pub fn corrupt_catalog(path: &Path, message: impl Into<String>) -> Self {
        Self::CorruptCatalog {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// True for errors that only affect a single source file.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
