use std::path::PathBuf;

/// Errors produced by the core tree service.
///
/// Every variant corresponds to exactly one HTTP status class at the service
/// boundary; the daemon owns that mapping. The display strings are the
/// human-readable messages clients see.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The resolved path escapes the served root.
    #[error("path escapes the served directory")]
    AccessDenied,

    /// The operation is disabled by configuration.
    #[error("{0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// The destination already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A non-recursive delete hit a directory with children.
    #[error("directory not empty: {}", .0.display())]
    DirectoryNotEmpty(PathBuf),

    /// An operating-system failure the caller may retry.
    #[error("system error: {0}")]
    System(#[from] std::io::Error),
}
