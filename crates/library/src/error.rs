//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Only two things can fail a whole request: a folder that can't be scanned,
//! and a request payload that can't be understood. Everything else (missing
//! metadata, individual conversions) is reported as data instead.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The folder (or something beneath it) could not be traversed.
    #[display("failed to scan folder: {}", _0.display())]
    Scan(#[error(not(source))] PathBuf),
    /// The request payload is missing fields or has the wrong shape.
    #[display("{_0}")]
    InvalidRequest(#[error(not(source))] String),
    /// No supported folder dialog is installed.
    #[display("no folder dialog (zenity or kdialog) detected on your system")]
    PickerNotFound,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
