//! Catalog fixtures for tests.
//!
//! Writes real SQLite files in the layout [`load_catalog`](crate::load_catalog)
//! reads. Every helper panics on failure: if test setup is wrong, then the
//! test should not pass.

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Executor};
use std::path::Path;

/// A book row to be written by [`write_catalog`].
#[derive(Debug, Clone)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub author_id: Option<i64>,
    pub author: Option<String>,
}
impl Book {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self { id, title: title.into(), category: None, author_id: None, author: None }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn author_id(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

async fn create(path: &Path) -> SqliteConnection {
    let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
    SqliteConnection::connect_with(&options).await.expect("fixture database should be creatable")
}

/// Write a catalog store containing `books`. Categories are created on the
/// fly from the distinct category names used.
pub async fn write_catalog(path: &Path, books: &[Book]) {
    let mut conn = create(path).await;
    conn.execute(include_str!("../queries/schema.sql")).await.expect("catalog schema should apply");
    let mut categories: Vec<&str> = Vec::new();
    for book in books {
        let category_id = match book.category.as_deref() {
            None => None,
            Some(name) => {
                let existing = categories.iter().position(|c| *c == name);
                let position = existing.unwrap_or_else(|| {
                    categories.push(name);
                    categories.len() - 1
                });
                let id = i64::try_from(position).expect("category count fits in i64") + 1;
                sqlx::query("INSERT OR IGNORE INTO categories (id, name) VALUES (?, ?)")
                    .bind(id)
                    .bind(name)
                    .execute(&mut conn)
                    .await
                    .expect("category should insert");
                Some(id)
            },
        };
        sqlx::query("INSERT INTO books (id, title, category_id, author_id, author) VALUES (?, ?, ?, ?, ?)")
            .bind(book.id)
            .bind(book.title.as_str())
            .bind(category_id)
            .bind(book.author_id)
            .bind(book.author.as_deref())
            .execute(&mut conn)
            .await
            .expect("book should insert");
    }
    conn.close().await.expect("fixture database should close");
}

/// Write an author lookup store.
pub async fn write_authors(path: &Path, authors: &[(i64, &str)]) {
    let mut conn = create(path).await;
    conn.execute(include_str!("../queries/schema_authors.sql")).await.expect("author schema should apply");
    for (id, name) in authors {
        sqlx::query("INSERT INTO authors (id, name) VALUES (?, ?)")
            .bind(*id)
            .bind(*name)
            .execute(&mut conn)
            .await
            .expect("author should insert");
    }
    conn.close().await.expect("fixture database should close");
}
