//! Read-only access to a single SQLite store (catalog or author lookup).

use crate::error::{ErrorKind, Result};
use crate::models::{AuthorLookup, AuthorRow, BookRow, Catalog};
use exn::ResultExt;
use futures::TryStreamExt;
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::path::{Path, PathBuf};

/// One open handle on a store. Opened and closed within a single load; never
/// held across requests.
pub(crate) struct Store {
    conn: SqliteConnection,
    path: PathBuf,
}

impl Store {
    pub(crate) async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .read_only(true)
            .create_if_missing(false);
        let conn = SqliteConnection::connect_with(&options).await.or_raise(|| ErrorKind::Open(path.clone()))?;
        Ok(Self { conn, path })
    }

    /// Read every author into `into`.
    ///
    /// Rows are inserted as they arrive, so on error `into` keeps whatever
    /// was read before the failure.
    pub(crate) async fn read_authors(&mut self, into: &mut AuthorLookup) -> Result<()> {
        let mut rows =
            sqlx::query_as::<_, AuthorRow>(include_str!("../queries/select_authors.sql")).fetch(&mut self.conn);
        while let Some(row) = rows.try_next().await.or_raise(|| ErrorKind::Query(self.path.clone()))? {
            if let Some(name) = row.name.filter(|name| !name.is_empty()) {
                into.insert(row.id, name);
            }
        }
        Ok(())
    }

    /// Read every book (joined with its category) into `into`, resolving
    /// authors against `authors`.
    ///
    /// Same partial-read semantics as [`read_authors`](Self::read_authors).
    pub(crate) async fn read_books(&mut self, authors: &AuthorLookup, into: &mut Catalog) -> Result<()> {
        let mut rows = sqlx::query_as::<_, BookRow>(include_str!("../queries/select_books.sql")).fetch(&mut self.conn);
        while let Some(row) = rows.try_next().await.or_raise(|| ErrorKind::Query(self.path.clone()))? {
            let id = row.id;
            into.insert(id, row.into_record(authors));
        }
        Ok(())
    }

    pub(crate) async fn close(self) {
        if let Err(err) = self.conn.close().await {
            tracing::debug!(store = %self.path.display(), error = %err, "Failed to close store cleanly");
        }
    }
}
