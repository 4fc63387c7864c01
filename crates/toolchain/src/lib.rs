//! External conversion toolchain.
//!
//! Converting an Access database into SQLite is delegated entirely to
//! [mdbtools](https://github.com/mdbtools/mdbtools) and the `sqlite3` shell.
//! This crate finds those executables and runs them, one process per source
//! file, reporting nothing but the exit status.

pub mod error;
mod shell;

pub use crate::shell::{ShellToolchain, ToolNames};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Something that can turn one legacy database into one SQLite store.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Convert `source` into the SQLite store at `destination`.
    ///
    /// Returns the exit status of the conversion; a non-zero status is a
    /// failed conversion, not an error. Errors are reserved for conversions
    /// that could not be attempted at all.
    async fn run(&self, source: &Path, destination: &Path) -> Result<i32>;
}
