//! Book catalog lookups for MDB discovery.
//!
//! Each legacy database file in a library is named after the numeric ID of
//! the book it contains. The human-readable metadata for those IDs lives in
//! a separate SQLite catalog (`catalog.db` by default), with author names
//! optionally resolved through a sibling "special" store (`special.db`).
//!
//! The catalog is never the source of truth and never required: every
//! failure to open or read it degrades to "no metadata" rather than an error.
//!
//! # Architecture
//! - [`load_catalog`] reads one catalog file (plus its author store) into an
//!   in-memory [`Catalog`].
//! - [`locate`] walks upwards from a folder looking for a catalog file that
//!   actually contains records, falling back to a configured default.

pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
mod locator;
mod models;
mod reader;
mod store;

pub use crate::locator::{DEFAULT_CATALOG_FILE_NAME, DEFAULT_MAX_LEVELS, LocateOptions, LocatedCatalog, locate};
pub use crate::models::{AuthorLookup, Catalog, MetadataRecord};
pub use crate::reader::{DEFAULT_AUTHORS_FILE_NAME, load_catalog};
