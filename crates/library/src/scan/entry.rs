use mdbridge_catalog::Catalog;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Extensions recognised as legacy Access databases.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["mdb", "accdb"];

/// Case-insensitive file extension filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}
impl ExtensionFilter {
    /// Accepts extensions with or without the leading dot (`"mdb"`, `".MDB"`).
    pub fn new(extensions: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn matches(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
    }
}
impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

/// A discovered database file, plus whatever the catalog knows about it.
///
/// Metadata fields are only present when the file name is a book ID *and*
/// the catalog has a record for it; `author` additionally requires the
/// record to have a non-empty author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedFileEntry {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}
impl EnrichedFileEntry {
    pub fn new(path: impl Into<PathBuf>, catalog: &Catalog) -> Self {
        let path = path.into();
        let identifier = path.file_stem().and_then(OsStr::to_str).and_then(parse_identifier);
        let mut entry = Self { path, identifier, title: None, category: None, author: None };
        if let Some(record) = identifier.and_then(|id| catalog.get(id)) {
            entry.title = Some(record.title.clone());
            entry.category = Some(record.category.clone());
            entry.author = record.author.clone().filter(|author| !author.is_empty());
        }
        entry
    }
}

/// Strict whole-string parse of a file stem into a book ID.
///
/// Every character must be an ASCII digit: signs, whitespace and any other
/// prefix or suffix invalidate the parse. Values that overflow an `i64` are
/// not IDs either.
pub fn parse_identifier(stem: &str) -> Option<i64> {
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdbridge_catalog::MetadataRecord;
    use rstest::rstest;

    fn catalog() -> Catalog {
        [
            (
                42,
                MetadataRecord {
                    title: "The Answer".to_string(),
                    category: "Reference".to_string(),
                    author: Some("Deep Thought".to_string()),
                },
            ),
            (7, MetadataRecord { title: "Lucky".to_string(), category: "Fiction".to_string(), author: None }),
        ]
        .into_iter()
        .collect()
    }

    #[rstest]
    #[case("42", Some(42))]
    #[case("0042", Some(42))]
    #[case("0", Some(0))]
    #[case("42x", None)]
    #[case("x42", None)]
    #[case("abc", None)]
    #[case("-42", None)]
    #[case("+42", None)]
    #[case(" 42", None)]
    #[case("4 2", None)]
    #[case("", None)]
    #[case("99999999999999999999", None)]
    fn test_parse_identifier(#[case] stem: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_identifier(stem), expected);
    }

    #[rstest]
    #[case("/library/42.mdb", true)]
    #[case("/library/42.MDB", true)]
    #[case("/library/42.Accdb", true)]
    #[case("/library/42.sqlite", false)]
    #[case("/library/42", false)]
    #[case("/library/.mdb", false)]
    #[case("/library/42.mdb.bak", false)]
    fn test_default_extensions(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(ExtensionFilter::default().matches(path), expected);
    }

    #[test]
    fn test_custom_extensions_are_normalized() {
        let filter = ExtensionFilter::new([".MDE", "", "mdb"]);
        assert!(filter.matches("a.mde"));
        assert!(filter.matches("a.MDB"));
        assert!(!filter.matches("a.accdb"));
    }

    #[test]
    fn test_enriches_known_identifier() {
        let entry = EnrichedFileEntry::new("/library/42.mdb", &catalog());
        assert_eq!(entry.identifier, Some(42));
        assert_eq!(entry.title.as_deref(), Some("The Answer"));
        assert_eq!(entry.category.as_deref(), Some("Reference"));
        assert_eq!(entry.author.as_deref(), Some("Deep Thought"));
    }

    #[test]
    fn test_record_without_author() {
        let entry = EnrichedFileEntry::new("/library/7.accdb", &catalog());
        assert_eq!(entry.title.as_deref(), Some("Lucky"));
        assert_eq!(entry.author, None);
    }

    #[rstest]
    #[case("/library/43.mdb", Some(43))]
    #[case("/library/42x.mdb", None)]
    #[case("/library/abc.mdb", None)]
    fn test_no_metadata_without_matching_record(#[case] path: &str, #[case] identifier: Option<i64>) {
        let entry = EnrichedFileEntry::new(path, &catalog());
        assert_eq!(entry.identifier, identifier);
        assert_eq!(entry.title, None);
        assert_eq!(entry.category, None);
        assert_eq!(entry.author, None);
    }

    #[test]
    fn test_serializes_without_absent_fields() {
        let entry = EnrichedFileEntry::new("/library/abc.mdb", &catalog());
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"path":"/library/abc.mdb"}"#);

        let entry = EnrichedFileEntry::new("/library/7.mdb", &catalog());
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"path":"/library/7.mdb","identifier":7,"title":"Lucky","category":"Fiction"}"#);
    }
}
