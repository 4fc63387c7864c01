use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::scan::entry::{EnrichedFileEntry, ExtensionFilter};
use crate::scan::error::{ErrorKind, Result as ScanResult};
use exn::ResultExt;
use mdbridge_catalog::Catalog;
use std::path::{Path, PathBuf};
use tokio::fs::{self, DirEntry};
use tracing::instrument;

enum WalkEntry {
    File(PathBuf),
    Descend(PathBuf),
    Skip,
}

/// Recursively discover every file under `folder` accepted by `extensions`,
/// enriched with metadata from `catalog`.
///
/// Returned paths are absolute (the folder is canonicalized first). Entries
/// come out in traversal order, which is stable for a given tree but not
/// sorted. Symlinks to files are included; symlinked directories are not
/// followed.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Scan>`](LibraryErrorKind::Scan) when the
/// folder is missing, isn't a directory, or any directory beneath it can't be
/// read. No partial result is returned.
#[instrument(skip_all, fields(folder = %folder.as_ref().display()))]
pub async fn scan(
    folder: impl AsRef<Path>,
    catalog: &Catalog,
    extensions: &ExtensionFilter,
) -> LibraryResult<Vec<EnrichedFileEntry>> {
    let folder = folder.as_ref();
    let entries = scan_inner(folder, catalog, extensions)
        .await
        .or_raise(|| LibraryErrorKind::Scan(folder.to_path_buf()))?;
    let enriched = entries.iter().filter(|entry| entry.title.is_some()).count();
    tracing::info!(files = entries.len(), enriched, "Folder scanned");
    Ok(entries)
}

async fn scan_inner(
    folder: &Path,
    catalog: &Catalog,
    extensions: &ExtensionFilter,
) -> ScanResult<Vec<EnrichedFileEntry>> {
    let root = fs::canonicalize(folder).await.map_err(|err| ErrorKind::from_io(err, folder))?;
    let metadata = fs::metadata(&root).await.map_err(|err| ErrorKind::from_io(err, &root))?;
    if !metadata.is_dir() {
        exn::bail!(ErrorKind::NotADirectory(root));
    }

    let mut found = Vec::new();
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        let mut entries = fs::read_dir(&current).await.map_err(|err| ErrorKind::from_io(err, &current))?;
        while let Some(entry) = entries.next_entry().await.map_err(|err| ErrorKind::from_io(err, &current))? {
            match classify(entry).await? {
                WalkEntry::Descend(path) => stack.push(path),
                WalkEntry::File(path) if extensions.matches(&path) => {
                    tracing::trace!(path = %path.display(), "Discovered database file");
                    found.push(EnrichedFileEntry::new(path, catalog));
                },
                WalkEntry::File(_) | WalkEntry::Skip => {},
            }
        }
    }
    Ok(found)
}

async fn classify(entry: DirEntry) -> ScanResult<WalkEntry> {
    let path = entry.path();
    let file_type = entry.file_type().await.map_err(|err| ErrorKind::from_io(err, &path))?;
    if file_type.is_dir() {
        return Ok(WalkEntry::Descend(path));
    }
    if file_type.is_file() {
        return Ok(WalkEntry::File(path));
    }
    if file_type.is_symlink() {
        // Note: silently drop broken symlinks, and don't descend into linked
        // directories (cycles).
        return Ok(match fs::metadata(&path).await {
            Ok(target) if target.is_file() => WalkEntry::File(path),
            _ => WalkEntry::Skip,
        });
    }
    Ok(WalkEntry::Skip)
}
