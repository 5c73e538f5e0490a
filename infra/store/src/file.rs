//! File-backed document adapter.
//!
//! Every database is a directory under the adapter root and every document a JSON file
//! inside it, sharded by the first four characters of its id. Writes use an atomic swap
//! (unique temp file, `fsync`, `rename`) so a crash never leaves a half-written document.

use crate::error::{StoreError, StoreErrorExt};
use crate::maintenance::{self, TMP_MARKER};
use crate::row::{Row, prepare, resolve_id};
use crate::security;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tdl_domain::constants::REV_KEY;
use tdl_kernel::safe_nanoid;
use tdl_model::{Properties, StorageConfig};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// On-disk encoding of document files.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    #[must_use]
    pub const fn from_flag(enabled: bool) -> Self {
        if enabled { Self::Lz4 } else { Self::None }
    }

    const fn extension(self) -> &'static str {
        match self {
            Self::None => "json",
            Self::Lz4 => "json.lz4",
        }
    }

    fn encode(self, properties: &Properties) -> Result<Vec<u8>, StoreError> {
        let json = serde_json::to_vec(properties).context("Encoding document")?;
        Ok(match self {
            Self::None => json,
            Self::Lz4 => lz4_flex::compress_prepend_size(&json),
        })
    }

    fn decode(self, bytes: &[u8]) -> Result<Properties, StoreError> {
        let json = match self {
            Self::None => bytes.to_vec(),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(bytes).context("Lz4 decompression failed")?
            },
        };
        serde_json::from_slice::<Properties>(&json).context("Decoding document")
    }
}

#[derive(Debug)]
struct FileInner {
    database: String,
    dir: PathBuf,
    compression: Compression,
    tmp_counter: AtomicU64,
    /// Serialises read-modify-write cycles (revision bumps) within this process.
    writes: Mutex<()>,
}

/// Document adapter persisting one database as a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileAdapter {
    inner: Arc<FileInner>,
}

impl FileAdapter {
    /// Opens (creating if needed) the directory of `database` under `root`.
    ///
    /// Stale temp files left by interrupted writes are purged before the adapter is
    /// returned; a failing cleanup only logs a warning.
    ///
    /// # Errors
    /// [`StoreError::Validation`] / [`StoreError::PathTraversal`] for unsafe database
    /// names, [`StoreError::Io`] if the directory cannot be created or resolved.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub async fn open(
        root: impl AsRef<Path>,
        database: &str,
        compression: Compression,
    ) -> Result<Self, StoreError> {
        security::validate_database(database)?;
        let root = root.as_ref();

        fs::create_dir_all(root)
            .await
            .context(format!("Failed to bootstrap store root: {}", root.display()))?;
        let root = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve store root: {}", root.display()))?;

        let dir = root.join(database);
        security::ensure_within(&root, &dir)?;
        fs::create_dir_all(&dir)
            .await
            .context(format!("Failed to create database directory: {}", dir.display()))?;

        maintenance::purge_tmp(&dir).await;
        info!(database, dir = %dir.display(), ?compression, "File document store opened");

        Ok(Self {
            inner: Arc::new(FileInner {
                database: database.to_owned(),
                dir,
                compression,
                tmp_counter: AtomicU64::new(1),
                writes: Mutex::new(()),
            }),
        })
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.inner.database
    }

    /// Directory holding this database's documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    fn path_of(&self, id: &str) -> Result<PathBuf, StoreError> {
        security::document_path(&self.inner.dir, id, self.inner.compression.extension())
    }

    pub(crate) async fn save(
        &self,
        storage: &StorageConfig,
        properties: Properties,
    ) -> Result<Row, StoreError> {
        let id = resolve_id(&properties)?;
        let path = self.path_of(&id)?;

        let _guard = self.inner.writes.lock().await;
        let previous = self.read_file(&path).await?;
        let previous_rev = previous.as_ref().and_then(|p| p.get(REV_KEY)).and_then(Value::as_str);
        let stored = prepare(storage, properties, &id, previous_rev);

        let bytes = self.inner.compression.encode(&stored)?;
        self.write_atomic(&path, &bytes).await?;

        debug!(database = %self.inner.database, %id, "Document saved atomically");
        Row::from_stored(stored)
    }

    pub(crate) async fn get(&self, id: &str) -> Result<Option<Row>, StoreError> {
        let path = self.path_of(id)?;
        self.read_file(&path).await?.map(Row::from_stored).transpose()
    }

    pub(crate) async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.path_of(id)?;
        let _guard = self.inner.writes.lock().await;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(database = %self.inner.database, %id, "Document deleted");
                Ok(())
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound { message: id.to_owned().into(), context: None })
            },
            Err(err) => Err(StoreError::Io {
                source: err,
                context: Some(format!("Failed to delete: {}", path.display()).into()),
            }),
        }
    }

    pub(crate) async fn query(&self, storage: &StorageConfig) -> Result<Vec<Row>, StoreError> {
        let dir = self.inner.dir.clone();
        let extension = self.inner.compression.extension();
        let files = tokio::task::spawn_blocking(move || maintenance::document_files(&dir, extension))
            .await
            .map_err(|e| StoreError::Internal {
                message: e.to_string().into(),
                context: Some("Document scan task failed".into()),
            })?;

        let mut rows = Vec::with_capacity(files.len());
        for path in files {
            let Some(properties) = self.read_file(&path).await? else {
                // Deleted between the scan and the read.
                continue;
            };
            if storage.matches(&properties) {
                rows.push(Row::from_stored(properties)?);
            }
        }
        rows.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(rows)
    }

    async fn read_file(&self, path: &Path) -> Result<Option<Properties>, StoreError> {
        match fs::read(path).await {
            Ok(bytes) => self
                .inner
                .compression
                .decode(&bytes)
                .map(Some)
                .context(format!("Reading {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io {
                source: err,
                context: Some(format!("Read failed: {}", path.display()).into()),
            }),
        }
    }

    async fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create shards for {}", path.display()))?;
        }

        let temp = self.unique_tmp_path(path);
        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(data).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StoreError::Io {
                source: err,
                context: Some(
                    format!("Atomic swap failed: {} -> {}", temp.display(), path.display()).into(),
                ),
            });
        }

        if let Some(parent) = path.parent() {
            sync_dir(parent).await;
        }
        Ok(())
    }

    /// Temp names carry a random suffix: other adapters may write into the same directory.
    fn unique_tmp_path(&self, target: &Path) -> PathBuf {
        let counter = self.inner.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("document");
        target.with_file_name(format!("{file_name}{TMP_MARKER}{counter}-{}", safe_nanoid!(8)))
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => warn!(path = %path.display(), error = %err, "Directory open failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn codecs_round_trip_documents() {
        let mut props = Properties::new();
        props.insert("name".to_owned(), json!("Ann"));

        for compression in [Compression::None, Compression::Lz4] {
            let bytes = compression.encode(&props).unwrap();
            assert_eq!(compression.decode(&bytes).unwrap(), props);
        }
        assert_eq!(Compression::from_flag(true), Compression::Lz4);
        assert_eq!(Compression::from_flag(false).extension(), "json");
    }

    #[tokio::test]
    async fn adapters_sharing_a_directory_never_share_temp_names() {
        let root = tempfile::tempdir().unwrap();
        let first = FileAdapter::open(root.path(), "todolite", Compression::None).await.unwrap();
        let second = FileAdapter::open(root.path(), "todolite", Compression::None).await.unwrap();

        let target = first.path_of("abcdef").unwrap();
        let a = first.unique_tmp_path(&target);
        let b = second.unique_tmp_path(&target);
        assert_ne!(a, b);
        assert!(a.to_string_lossy().contains(TMP_MARKER));
    }

    #[test]
    fn corrupt_lz4_is_reported() {
        let err = Compression::Lz4.decode(b"\x05\x00\x00\x00garbage").unwrap_err();
        assert!(matches!(err, StoreError::Decompress { .. } | StoreError::Json { .. }));
    }
}
