//! Error types for pipeline stages and the stores behind them.

use std::path::PathBuf;

/// Errors produced by [`ObjectStore`](crate::store::ObjectStore) and
/// [`RecordStore`](crate::store::RecordStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("invalid object key {0:?}")]
    InvalidKey(String),

    #[error("i/o error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by a stage invocation.
///
/// Recoverable conditions (malformed lines, unrecognized files) never surface
/// here; they are absorbed and reflected in the stage outcome.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid event format: {0}")]
    InvalidEvent(String),

    #[error("batch {key} is not valid UTF-8: {source}")]
    Decode {
        key: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("reference data {key} unusable: {reason}")]
    ReferenceData { key: String, reason: String },

    #[error("validation failed for {filename} with {defects} errors")]
    ValidationFailed { filename: String, defects: usize },

    #[error("persist record {record_id} failed after {persisted} records: {source}")]
    Persist {
        record_id: String,
        persisted: usize,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
