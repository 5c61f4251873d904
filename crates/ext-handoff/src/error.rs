//! Error types for ext-handoff

use std::path::PathBuf;

/// Result type for ext-handoff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while storing or reading handoff entries
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid store key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Time-to-live of {seconds}s is out of range")]
    InvalidTtl { seconds: u64 },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Corrupt store entry at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
