//! Batch conversion of legacy databases into SQLite.
//!
//! [`convert`] drives a [`Toolchain`] once per source file, strictly in
//! order, and collects every exit status into a [`ConversionBatchResult`].
//!
//! # Batch contract
//! Every file is always attempted. A failed conversion is recorded on its
//! [`ConversionItem`] and turns [`overall_success`](ConversionBatchResult::overall_success)
//! off, but never stops the files after it. Callers relying on partial
//! success inspect each item's [`exit_status`](ConversionItem::exit_status).

use mdbridge_toolchain::Toolchain;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Extension given to every converted database.
pub const DESTINATION_EXTENSION: &str = "sqlite";

/// Exit status recorded when the toolchain could not even be started.
pub const SPAWN_FAILURE_STATUS: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionItem {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub exit_status: i32,
}
impl ConversionItem {
    pub fn succeeded(&self) -> bool {
        self.exit_status == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionBatchResult {
    /// `true` only when every item exited with status zero (including the
    /// vacuous case of an empty batch).
    pub overall_success: bool,
    /// One item per input file, in input order.
    pub items: Vec<ConversionItem>,
}

/// Where the SQLite store for `source` is written.
///
/// Same file stem as the source with a `.sqlite` extension, placed inside
/// `output_dir` when given, otherwise next to the source.
pub fn destination_path(source: impl AsRef<Path>, output_dir: Option<&Path>) -> PathBuf {
    let source = source.as_ref();
    let directory = output_dir.or_else(|| source.parent()).unwrap_or_else(|| Path::new(""));
    let mut name = OsString::from(source.file_stem().unwrap_or_default());
    name.push(".");
    name.push(DESTINATION_EXTENSION);
    directory.join(name)
}

/// Convert every file in `files`, in order, with `toolchain`.
///
/// See the [module documentation](self) for the batch contract: all files
/// are attempted regardless of earlier failures.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn convert(
    toolchain: &dyn Toolchain,
    files: &[PathBuf],
    output_dir: Option<&Path>,
) -> ConversionBatchResult {
    let mut items = Vec::with_capacity(files.len());
    for source in files {
        let destination = destination_path(source, output_dir);
        let exit_status = match toolchain.run(source, &destination).await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(source = %source.display(), error = ?err, "Conversion could not be attempted");
                SPAWN_FAILURE_STATUS
            },
        };
        items.push(ConversionItem { source_path: source.clone(), destination_path: destination, exit_status });
    }
    let overall_success = items.iter().all(ConversionItem::succeeded);
    let failed = items.iter().filter(|item| !item.succeeded()).count();
    tracing::info!(converted = items.len() - failed, failed, "Conversion batch finished");
    ConversionBatchResult { overall_success, items }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use mdbridge_toolchain::error::{ErrorKind as ToolchainErrorKind, Result as ToolchainResult};
    use rstest::rstest;
    use std::sync::Mutex;

    /// Records every invocation; fails any source whose file name is listed.
    #[derive(Default)]
    pub(crate) struct RecordingToolchain {
        pub(crate) failing: Vec<&'static str>,
        pub(crate) unstartable: Vec<&'static str>,
        pub(crate) calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    }
    impl RecordingToolchain {
        pub(crate) fn failing(names: &[&'static str]) -> Self {
            Self { failing: names.to_vec(), ..Self::default() }
        }

        pub(crate) fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
            self.calls.lock().unwrap().clone()
        }

        fn named(names: &[&'static str], path: &Path) -> bool {
            path.file_name().and_then(|n| n.to_str()).is_some_and(|n| names.iter().any(|name| *name == n))
        }
    }
    #[async_trait]
    impl Toolchain for RecordingToolchain {
        async fn run(&self, source: &Path, destination: &Path) -> ToolchainResult<i32> {
            self.calls.lock().unwrap().push((source.to_path_buf(), destination.to_path_buf()));
            if Self::named(&self.unstartable, source) {
                exn::bail!(ToolchainErrorKind::Spawn(source.display().to_string()));
            }
            Ok(if Self::named(&self.failing, source) { 1 } else { 0 })
        }
    }

    #[rstest]
    #[case("/library/42.mdb", None, "/library/42.sqlite")]
    #[case("/library/42.mdb", Some("/out"), "/out/42.sqlite")]
    #[case("/library/my.book.accdb", None, "/library/my.book.sqlite")]
    #[case("42.mdb", None, "42.sqlite")]
    #[case("/library/noext", Some("/out"), "/out/noext.sqlite")]
    fn test_destination_path(#[case] source: &str, #[case] output_dir: Option<&str>, #[case] expected: &str) {
        assert_eq!(destination_path(source, output_dir.map(Path::new)), PathBuf::from(expected));
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let toolchain = RecordingToolchain::failing(&["b.mdb"]);
        let files = vec![PathBuf::from("/in/a.mdb"), PathBuf::from("/in/b.mdb"), PathBuf::from("/in/c.mdb")];

        let result = convert(&toolchain, &files, None).await;
        assert!(!result.overall_success);
        let statuses: Vec<i32> = result.items.iter().map(|item| item.exit_status).collect();
        assert_eq!(statuses, vec![0, 1, 0]);
        let sources: Vec<&Path> = result.items.iter().map(|item| item.source_path.as_path()).collect();
        assert_eq!(sources, vec![Path::new("/in/a.mdb"), Path::new("/in/b.mdb"), Path::new("/in/c.mdb")]);
        assert_eq!(toolchain.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_all_succeed_into_output_dir() {
        let toolchain = RecordingToolchain::default();
        let files = vec![PathBuf::from("/in/a.mdb"), PathBuf::from("/in/sub/b.accdb")];

        let result = convert(&toolchain, &files, Some(Path::new("/out"))).await;
        assert!(result.overall_success);
        assert_eq!(
            toolchain.calls(),
            vec![
                (PathBuf::from("/in/a.mdb"), PathBuf::from("/out/a.sqlite")),
                (PathBuf::from("/in/sub/b.accdb"), PathBuf::from("/out/b.sqlite")),
            ]
        );
    }

    #[tokio::test]
    async fn test_unstartable_conversion_is_recorded() {
        let toolchain = RecordingToolchain { unstartable: vec!["a.mdb"], ..RecordingToolchain::default() };
        let files = vec![PathBuf::from("/in/a.mdb"), PathBuf::from("/in/b.mdb")];

        let result = convert(&toolchain, &files, None).await;
        assert!(!result.overall_success);
        assert_eq!(result.items[0].exit_status, SPAWN_FAILURE_STATUS);
        assert_eq!(result.items[1].exit_status, 0);
    }

    #[tokio::test]
    async fn test_empty_batch_succeeds() {
        let result = convert(&RecordingToolchain::default(), &[], None).await;
        assert!(result.overall_success);
        assert!(result.items.is_empty());
    }
}
