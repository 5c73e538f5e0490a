use crate::error::StoreError;
use crate::file::{Compression, FileAdapter};
use crate::memory::MemoryAdapter;
use crate::store::DocumentStore;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tdl_domain::config::{AdapterKind, DatabaseConfig};
use tdl_model::StorageConfig;
use tracing::{debug, instrument};

type StoreKey = (AdapterKind, String);

#[derive(Debug)]
struct AdapterRegistryInner {
    root: PathBuf,
    compression: Compression,
    stores: Mutex<FxHashMap<StoreKey, DocumentStore>>,
}

/// Opened document stores keyed by adapter kind and database name.
///
/// Every model definition pointing at the same `(adapter, database)` pair shares one
/// store handle.
#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    inner: Arc<AdapterRegistryInner>,
}

impl AdapterRegistry {
    /// Creates an empty registry; file-backed stores live under `root`.
    pub fn new(root: impl Into<PathBuf>, compression: Compression) -> Self {
        Self {
            inner: Arc::new(AdapterRegistryInner {
                root: root.into(),
                compression,
                stores: Mutex::new(FxHashMap::default()),
            }),
        }
    }

    #[must_use]
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.root.clone(), Compression::from_flag(config.compression))
    }

    /// Returns the store for `storage`, opening it on first use.
    ///
    /// # Errors
    /// Whatever opening the adapter returns (invalid database names, I/O failures).
    #[instrument(skip(self, storage), fields(adapter = %storage.adapter(), database = storage.database()))]
    pub async fn open(&self, storage: &StorageConfig) -> Result<DocumentStore, StoreError> {
        let key = (storage.adapter(), storage.database().to_owned());
        let cached = self.inner.stores.lock().get(&key).cloned();
        if let Some(store) = cached {
            return Ok(store);
        }

        let opened: DocumentStore = match key.0 {
            AdapterKind::Memory => MemoryAdapter::new(key.1.clone()).into(),
            AdapterKind::File => {
                FileAdapter::open(&self.inner.root, &key.1, self.inner.compression).await?.into()
            },
        };

        // A concurrent open may have won the race; keep whichever landed first.
        let store = self.inner.stores.lock().entry(key).or_insert(opened).clone();
        debug!("Document store ready");
        Ok(store)
    }

    /// Number of opened stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.stores.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
