//! Persistence error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from a key-value slot
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("Invalid slot key: '{0}'")]
    InvalidKey(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while saving or loading the application state
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed state document: {0}")]
    Shape(String),
}
