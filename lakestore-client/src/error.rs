//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed paths or an empty source list. Raised before any remote call
    /// when the caller's input is at fault.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Destination already exists, or is a directory.
    #[error("destination conflict: {0}")]
    DestinationConflict(String),

    /// A source does not exist or is not a file.
    #[error("source missing: {0}")]
    SourceMissing(String),

    /// Store unreachable or returned a server error.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Fieldless mirror of [`StoreError`] for matching and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    DestinationConflict,
    SourceMissing,
    TransportFailure,
    Config,
}

impl StoreError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            StoreError::DestinationConflict(_) => ErrorKind::DestinationConflict,
            StoreError::SourceMissing(_) => ErrorKind::SourceMissing,
            StoreError::TransportFailure(_) => ErrorKind::TransportFailure,
            StoreError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<lakestore_types::Error> for StoreError {
    fn from(err: lakestore_types::Error) -> Self {
        StoreError::InvalidArgument(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::TransportFailure(format!("malformed response: {err}"))
    }
}
