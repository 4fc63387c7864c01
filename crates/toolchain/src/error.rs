//! Toolchain Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A toolchain error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for toolchain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A required executable is not installed (or not on `PATH`).
    #[display("{_0} not detected on your system")]
    ToolNotFound(#[error(not(source))] String),
    /// The conversion process could not be started at all.
    #[display("unable to start conversion for {_0}")]
    Spawn(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
