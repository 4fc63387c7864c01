use crate::models::Catalog;
use crate::reader::{DEFAULT_AUTHORS_FILE_NAME, load_catalog};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// File name searched for by [`locate`].
pub const DEFAULT_CATALOG_FILE_NAME: &str = "catalog.db";
/// Number of directory levels (starting folder included) searched by [`locate`].
pub const DEFAULT_MAX_LEVELS: usize = 5;

/// Where and how far [`locate`] should look for a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateOptions {
    /// File name of the catalog store at each level.
    pub file_name: String,
    /// File name of the author store, sibling to whichever catalog is found.
    pub authors_file_name: String,
    /// Maximum number of levels checked: the starting folder plus each parent.
    pub max_levels: usize,
    /// Catalog loaded when no level yields any records. Defaults to
    /// [`file_name`](Self::file_name) relative to the working directory.
    pub fallback: Option<PathBuf>,
}
impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_CATALOG_FILE_NAME.to_string(),
            authors_file_name: DEFAULT_AUTHORS_FILE_NAME.to_string(),
            max_levels: DEFAULT_MAX_LEVELS,
            fallback: None,
        }
    }
}
impl LocateOptions {
    fn fallback_path(&self) -> PathBuf {
        self.fallback.clone().unwrap_or_else(|| PathBuf::from(&self.file_name))
    }
}

/// The catalog chosen by [`locate`], plus diagnostics about how it was found.
#[derive(Debug, Clone)]
pub struct LocatedCatalog {
    pub catalog: Catalog,
    /// Path of the catalog actually used (may be the fallback).
    pub source: PathBuf,
    /// Number of directory levels checked before stopping. The starting
    /// folder counts as the first level, so `levels_searched - 1` parents
    /// were visited.
    pub levels_searched: usize,
    /// `true` when no level yielded records and the fallback was loaded.
    pub fallback: bool,
}

/// Find and load the nearest non-empty catalog above `start`.
///
/// Checks `start` and then each of its parents, up to
/// [`max_levels`](LocateOptions::max_levels) levels in total, for a file
/// named [`file_name`](LocateOptions::file_name). The first level where that
/// file exists *and* loads at least one record wins. The ascent also stops
/// early once there is no parent left (the root, or the empty path of a
/// relative `start`).
///
/// If nothing is found the fallback catalog is loaded instead, which may
/// itself be empty. I/O errors during the walk are treated as "not here".
#[instrument(skip_all, fields(start = %start.as_ref().display()))]
pub async fn locate(start: impl AsRef<Path>, options: &LocateOptions) -> LocatedCatalog {
    let mut current = Some(start.as_ref());
    let mut levels_searched = 0;
    while levels_searched < options.max_levels {
        let Some(dir) = current.filter(|dir| !dir.as_os_str().is_empty()) else {
            break;
        };
        levels_searched += 1;
        let candidate = dir.join(&options.file_name);
        match tokio::fs::try_exists(&candidate).await {
            Ok(true) => {
                let catalog = load_catalog(&candidate, &options.authors_file_name).await;
                if !catalog.is_empty() {
                    tracing::info!(source = %candidate.display(), records = catalog.len(), "Catalog located");
                    return LocatedCatalog { catalog, source: candidate, levels_searched, fallback: false };
                }
                tracing::debug!(candidate = %candidate.display(), "Catalog found but empty; continuing search");
            },
            Ok(false) => {},
            Err(err) => tracing::debug!(candidate = %candidate.display(), error = %err, "Unable to check for catalog"),
        }
        current = dir.parent();
    }

    let source = options.fallback_path();
    let catalog = load_catalog(&source, &options.authors_file_name).await;
    tracing::info!(source = %source.display(), records = catalog.len(), "Using fallback catalog");
    LocatedCatalog { catalog, source, levels_searched, fallback: true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Book, write_catalog};
    use rstest::rstest;
    use tempfile::TempDir;

    fn options_with_fallback(fallback: impl Into<PathBuf>) -> LocateOptions {
        LocateOptions { fallback: Some(fallback.into()), ..LocateOptions::default() }
    }

    fn nested(root: &Path, depth: usize) -> PathBuf {
        let mut dir = root.to_path_buf();
        for level in 0..depth {
            dir.push(format!("level{level}"));
        }
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_finds_catalog_in_start_folder() {
        let root = TempDir::new().unwrap();
        write_catalog(&root.path().join("catalog.db"), &[Book::new(1, "One")]).await;

        let located = locate(root.path(), &options_with_fallback(root.path().join("missing.db"))).await;
        assert_eq!(located.source, root.path().join("catalog.db"));
        assert_eq!(located.levels_searched, 1);
        assert!(!located.fallback);
        assert_eq!(located.catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_finds_catalog_three_levels_up() {
        let root = TempDir::new().unwrap();
        write_catalog(&root.path().join("catalog.db"), &[Book::new(1, "One"), Book::new(2, "Two")]).await;
        let start = nested(root.path(), 3);

        let located = locate(&start, &options_with_fallback(root.path().join("missing.db"))).await;
        assert_eq!(located.source, root.path().join("catalog.db"));
        // Start folder plus three ascents.
        assert_eq!(located.levels_searched, 4);
        assert_eq!(located.catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_nearest_non_empty_catalog_wins() {
        let root = TempDir::new().unwrap();
        write_catalog(&root.path().join("catalog.db"), &[Book::new(1, "Root")]).await;
        let middle = nested(root.path(), 1);
        write_catalog(&middle.join("catalog.db"), &[Book::new(1, "Middle")]).await;
        let start = nested(root.path(), 2);

        let located = locate(&start, &options_with_fallback(root.path().join("missing.db"))).await;
        assert_eq!(located.source, middle.join("catalog.db"));
        assert_eq!(located.catalog.get(1).unwrap().title, "Middle");
    }

    #[tokio::test]
    async fn test_empty_catalog_is_skipped() {
        let root = TempDir::new().unwrap();
        write_catalog(&root.path().join("catalog.db"), &[Book::new(1, "Root")]).await;
        let start = nested(root.path(), 1);
        write_catalog(&start.join("catalog.db"), &[]).await;

        let located = locate(&start, &options_with_fallback(root.path().join("missing.db"))).await;
        assert_eq!(located.source, root.path().join("catalog.db"));
        assert_eq!(located.levels_searched, 2);
    }

    #[rstest]
    #[case(4, false)]
    #[case(5, true)]
    #[tokio::test]
    async fn test_search_is_bounded(#[case] depth: usize, #[case] expect_fallback: bool) {
        let root = TempDir::new().unwrap();
        write_catalog(&root.path().join("catalog.db"), &[Book::new(1, "Root")]).await;
        let fallback_dir = TempDir::new().unwrap();
        let fallback = fallback_dir.path().join("fallback.db");
        write_catalog(&fallback, &[Book::new(9, "Fallback")]).await;
        let start = nested(root.path(), depth);

        let located = locate(&start, &options_with_fallback(&fallback)).await;
        assert_eq!(located.fallback, expect_fallback);
        assert!(located.levels_searched <= DEFAULT_MAX_LEVELS);
        if expect_fallback {
            assert_eq!(located.source, fallback);
            assert!(located.catalog.get(9).is_some());
        } else {
            assert_eq!(located.source, root.path().join("catalog.db"));
        }
    }

    #[tokio::test]
    async fn test_missing_everywhere_yields_empty_fallback() {
        let root = TempDir::new().unwrap();
        let fallback = root.path().join("nope.db");
        let located = locate(root.path(), &options_with_fallback(&fallback)).await;
        assert!(located.fallback);
        assert_eq!(located.source, fallback);
        assert!(located.catalog.is_empty());
    }

    #[tokio::test]
    async fn test_relative_start_stops_at_empty_parent() {
        let root = TempDir::new().unwrap();
        let options = LocateOptions { max_levels: 10, ..options_with_fallback(root.path().join("nope.db")) };
        // "a/b" -> "a" -> "" (stop), so only two levels are ever checked.
        let located = locate("mdbridge-test-nonexistent/b", &options).await;
        assert_eq!(located.levels_searched, 2);
        assert!(located.fallback);
    }

    #[test]
    fn test_default_fallback_is_relative_file_name() {
        assert_eq!(LocateOptions::default().fallback_path(), PathBuf::from("catalog.db"));
    }
}
