//! Recursive discovery of legacy database files.
//!
//! [`scan`] walks a folder, keeps every regular file whose extension is in
//! the [`ExtensionFilter`], and enriches each one with metadata from a
//! [`Catalog`](mdbridge_catalog::Catalog) when its file name is a book ID
//! (`42.mdb` is book `42`; `42x.mdb` and `abc.mdb` are nothing in particular).
//!
//! Enrichment is best-effort and never fails. The walk itself is the only
//! fatal part of discovery: if any directory can't be read, the whole scan
//! fails and no partial list is returned.

mod entry;
pub(crate) mod error;
mod walk;

pub use self::entry::{DEFAULT_EXTENSIONS, EnrichedFileEntry, ExtensionFilter, parse_identifier};
pub use self::walk::scan;
