//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! None of these ever escape [`load_catalog`](crate::load_catalog) or
//! [`locate`](crate::locate); they exist so the reader can log *why* the
//! metadata was unavailable.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("unable to open catalog store: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    #[display("catalog query failed: {}", _0.display())]
    Query(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
