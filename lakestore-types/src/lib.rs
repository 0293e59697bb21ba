//! Core value types for lakestore.
//!
//! Everything here is a request-scoped descriptor:
//! - Validated, normalized store paths
//! - Non-empty ordered source lists for concatenation
//! - The kind of item a store probe reports
//!
//! Nothing in this crate talks to a store.

mod kind;
mod path;

pub use kind::ItemKind;
pub use path::{SourcePaths, StorePath, ADL_SCHEME};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building path values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("path is empty")]
    EmptyPath,

    #[error("path contains an empty segment: {0}")]
    EmptySegment(String),

    #[error("path contains a relative segment: {0}")]
    RelativeSegment(String),

    #[error("path contains a control character: {0:?}")]
    ControlCharacter(String),

    #[error("fully-qualified path has no host: {0}")]
    MissingHost(String),

    #[error("at least one source path is required")]
    EmptySourceList,
}
