use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Marker embedded in temporary file names during atomic writes.
pub(crate) const TMP_MARKER: &str = ".tdltmp.";

/// Temp files younger than this may belong to an in-flight write.
const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes temp files orphaned by interrupted writes, then prunes empty shard directories.
pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up temporary document files");
        },
        Err(e) => error!(error = %e, "Temp file cleanup task panicked"),
        _ => {},
    }
}

fn remove_stale(root: &Path, now: SystemTime) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    for entry in WalkDir::new(root).contents_first(true).into_iter().flatten() {
        let path = entry.path();
        if path == root {
            continue;
        }
        if entry.file_type().is_dir() {
            // Fails harmlessly on non-empty directories.
            let _ = std::fs::remove_dir(path);
        } else if is_tmp(&entry) && is_stale(&entry, now) {
            match std::fs::remove_file(path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove temp file");
                    failed += 1;
                },
            }
        }
    }

    (removed, failed)
}

/// Collects every document file under `root` whose name ends with `.<extension>`.
pub(crate) fn document_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let suffix = format!(".{extension}");
    WalkDir::new(root)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file() && !is_tmp(e))
        .filter(|e| e.file_name().to_str().is_some_and(|name| name.ends_with(&suffix)))
        .map(DirEntry::into_path)
        .collect()
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}
