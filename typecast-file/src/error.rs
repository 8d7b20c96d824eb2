//! Error types for the file adapter.

use std::path::PathBuf;

use thiserror::Error;
use typecast_engine::EngineError;

/// Result type for file adapter operations.
pub type FileResult<T> = Result<T, FileError>;

/// Errors that can occur while loading or saving serialized files.
///
/// Every I/O variant carries the offending path; wrapped causes stay
/// available through `source()`.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file does not exist.
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid JSON.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file or its parent directories could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine rejected the data.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
