// src/error.rs

//! Error types for mirror construction

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mirror operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a mirror
#[derive(Error, Debug)]
pub enum Error {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Attachment tree traversal failed
    #[error("failed to walk attachment tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// Output directory already exists and --force was not given
    #[error("output directory {0} already exists (use --force to overwrite)")]
    OutputExists(PathBuf),

    /// Source document body is present but is not valid JSON
    #[error("malformed document body {path}: {source}")]
    MalformedBody {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Source document body parsed, but is not a JSON object
    #[error("document body {0} is not a JSON object")]
    BodyNotObject(PathBuf),

    /// Remote `_changes` response could not be interpreted as a change feed
    #[error("remote change feed is not valid: {0}")]
    MalformedChangeFeed(String),

    /// Remote document id resolves outside the output directory
    #[error("document id {0} escapes the output directory")]
    UnsafeDocumentId(String),
}
