use crate::error::Result;
use crate::models::{AuthorLookup, Catalog};
use crate::store::Store;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// File name of the author lookup store, expected next to the catalog.
pub const DEFAULT_AUTHORS_FILE_NAME: &str = "special.db";

/// Load every book record from the catalog at `path`.
///
/// Author names are first resolved through the sibling store named
/// `authors_file_name` (in the same directory as the catalog), falling back
/// to the author name stored inline on each book.
///
/// This never fails. A missing or unreadable catalog results in an empty
/// [`Catalog`]; a failure partway through results in whatever records were
/// read up to that point. A missing or broken author store only means that
/// inline author names are used instead.
#[instrument(skip_all, fields(catalog = %path.as_ref().display()))]
pub async fn load_catalog(path: impl AsRef<Path>, authors_file_name: &str) -> Catalog {
    let path = path.as_ref();
    let authors = load_authors(&authors_path(path, authors_file_name)).await;
    let mut catalog = Catalog::new();
    if let Err(err) = load_books(path, &authors, &mut catalog).await {
        if catalog.is_empty() {
            tracing::debug!(error = ?err, "Catalog unavailable; continuing without metadata");
        } else {
            tracing::warn!(records = catalog.len(), error = ?err, "Catalog only partially loaded");
        }
    }
    catalog
}

fn authors_path(catalog: &Path, authors_file_name: &str) -> PathBuf {
    catalog.with_file_name(authors_file_name)
}

/// Best-effort: always returns whatever authors could be read.
async fn load_authors(path: &Path) -> AuthorLookup {
    let mut authors = AuthorLookup::new();
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        tracing::trace!(store = %path.display(), "No author store found");
        return authors;
    }
    if let Err(err) = read_authors(path, &mut authors).await {
        tracing::debug!(store = %path.display(), read = authors.len(), error = ?err, "Author store unavailable");
    }
    authors
}

async fn read_authors(path: &Path, into: &mut AuthorLookup) -> Result<()> {
    let mut store = Store::open(path).await?;
    let result = store.read_authors(into).await;
    store.close().await;
    result
}

async fn load_books(path: &Path, authors: &AuthorLookup, into: &mut Catalog) -> Result<()> {
    let mut store = Store::open(path).await?;
    let result = store.read_books(authors, into).await;
    store.close().await;
    result
}
