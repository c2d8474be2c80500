// Error taxonomy for category interchange

use crate::format::Format;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the codec, store, importer and exporter.
#[derive(Debug, Error)]
pub enum RollError {
    /// Input text is malformed for the declared format
    #[error("Failed to decode {format}: {message}")]
    Decode { format: Format, message: String },

    /// Categories could not be rendered in the requested format
    #[error("Failed to encode {format}: {message}")]
    Encode { format: Format, message: String },

    /// File extension does not map to a known format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Storage write capability was not granted by the caller
    #[error("Permission to write to storage was denied")]
    PermissionDenied,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML and YAML exports hold exactly one category per file
    #[error("Cannot export {count} categories as a single {format} document; use json")]
    MultiDocumentExport { format: Format, count: usize },

    #[error("No categories to export")]
    NothingToExport,

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Invalid store key: {0}")]
    InvalidKey(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, RollError>;
