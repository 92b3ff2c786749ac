//! Error types for mediadeck.
//!
//! Move rejections carry a human-readable reason that is surfaced to the
//! dashboard unchanged; everything else maps onto a JSON-RPC error code.

use std::path::PathBuf;
use thiserror::Error;

/// Reason a move request was refused before reaching the move queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("{name} exists only in the torrent client, nothing to move")]
    NoPath { name: String },

    #[error("{name} is not allowed to be moved")]
    NotAllowed { name: String },

    #[error("{name} is currently moving to {target}")]
    CurrentlyMoving { name: String, target: String },

    #[error("source path {0} does not exist")]
    SourceMissing(PathBuf),

    #[error("{name} has no move target selected")]
    NoTarget { name: String },

    #[error("{0} is not a known move target")]
    UnknownTarget(PathBuf),

    #[error("target directory {0} does not exist")]
    TargetMissing(PathBuf),

    #[error("move requests buffer full ({capacity} queued), try again later")]
    BufferFull { capacity: usize },
}

/// Main error type for the mediadeck library.
#[derive(Debug, Error)]
pub enum MediaDeckError {
    #[error("Move rejected: {0}")]
    MoveRejected(#[from] MoveRejection),

    #[error("Item not found: {name}")]
    ItemNotFound { name: String },

    #[error("Torrent client error: {message}")]
    TorrentClient { message: String },

    #[error("Listing {root:?} failed: {message}")]
    Listing { root: PathBuf, message: String },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Cron job {name} already registered")]
    CronJobExists { name: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for mediadeck operations.
pub type Result<T> = std::result::Result<T, MediaDeckError>;

impl From<std::io::Error> for MediaDeckError {
    fn from(err: std::io::Error) -> Self {
        MediaDeckError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for MediaDeckError {
    fn from(err: serde_json::Error) -> Self {
        MediaDeckError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for MediaDeckError {
    fn from(err: reqwest::Error) -> Self {
        MediaDeckError::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl MediaDeckError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        MediaDeckError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Network or torrent client error
    /// - -32002: Item not found
    /// - -32005: Move rejected or validation error
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            MediaDeckError::Network { .. } | MediaDeckError::TorrentClient { .. } => -32000,
            MediaDeckError::ItemNotFound { .. } => -32002,
            MediaDeckError::MoveRejected(_) => -32005,
            MediaDeckError::InvalidParams { .. } => -32602,
            _ => -32603,
        }
    }

    /// The rejection reason, if this error is a refused move.
    pub fn rejection(&self) -> Option<&MoveRejection> {
        match self {
            MediaDeckError::MoveRejected(r) => Some(r),
            _ => None,
        }
    }
}
