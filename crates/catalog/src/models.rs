use std::collections::HashMap;

/// Author ID to display name, as read from the "special" author store.
pub type AuthorLookup = HashMap<i64, String>;

/// Human-readable metadata for a single book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: String,
    pub category: String,
    /// Only ever `Some` with a non-empty name.
    pub author: Option<String>,
}

/// Every book record from one catalog load, keyed by book ID.
///
/// Built fresh on every load; there is no caching between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: HashMap<i64, MetadataRecord>,
}
impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: i64) -> Option<&MetadataRecord> {
        self.records.get(&id)
    }

    /// Insert a record, returning the one it replaced (if any).
    pub fn insert(&mut self, id: i64, record: MetadataRecord) -> Option<MetadataRecord> {
        self.records.insert(id, record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
impl FromIterator<(i64, MetadataRecord)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (i64, MetadataRecord)>>(iter: T) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AuthorRow {
    pub(crate) id: i64,
    pub(crate) name: Option<String>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct BookRow {
    pub(crate) id: i64,
    title: Option<String>,
    author_id: Option<i64>,
    author: Option<String>,
    category: Option<String>,
}
impl BookRow {
    /// Resolves the author in order of precedence: the author store entry
    /// for `author_id`, then the row's inline author name, then nothing.
    pub(crate) fn into_record(self, authors: &AuthorLookup) -> MetadataRecord {
        let author = self
            .author_id
            .and_then(|id| authors.get(&id))
            .filter(|name| !name.is_empty())
            .cloned()
            .or(self.author.filter(|name| !name.is_empty()));
        MetadataRecord {
            title: self.title.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            author,
        }
    }
}
