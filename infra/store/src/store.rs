use crate::error::StoreError;
use crate::file::FileAdapter;
use crate::memory::MemoryAdapter;
use crate::row::Row;
use tdl_domain::config::AdapterKind;
use tdl_model::{Properties, StorageConfig};

/// An opened document database, dispatching to the adapter selected by [`AdapterKind`].
#[derive(Debug, Clone)]
pub enum DocumentStore {
    Memory(MemoryAdapter),
    File(FileAdapter),
}

impl DocumentStore {
    #[must_use]
    pub const fn kind(&self) -> AdapterKind {
        match self {
            Self::Memory(_) => AdapterKind::Memory,
            Self::File(_) => AdapterKind::File,
        }
    }

    #[must_use]
    pub fn database(&self) -> &str {
        match self {
            Self::Memory(adapter) => adapter.database(),
            Self::File(adapter) => adapter.database(),
        }
    }

    /// Persists a document of the type described by `storage`.
    ///
    /// The document keeps its `_id` when it has one and gets a fresh id otherwise. The
    /// type's static properties are merged over the user fields and `_rev` is bumped.
    ///
    /// # Errors
    /// [`StoreError::Validation`] for malformed ids; adapter I/O errors otherwise.
    pub async fn save(
        &self,
        storage: &StorageConfig,
        properties: Properties,
    ) -> Result<Row, StoreError> {
        match self {
            Self::Memory(adapter) => adapter.save(storage, properties),
            Self::File(adapter) => adapter.save(storage, properties).await,
        }
    }

    /// Fetches one document by id.
    ///
    /// # Errors
    /// [`StoreError::Validation`] for malformed ids; adapter I/O errors otherwise.
    pub async fn get(&self, id: &str) -> Result<Option<Row>, StoreError> {
        match self {
            Self::Memory(adapter) => adapter.get(id),
            Self::File(adapter) => adapter.get(id).await,
        }
    }

    /// Removes one document by id.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if there is no such document.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(adapter) => adapter.delete(id),
            Self::File(adapter) => adapter.delete(id).await,
        }
    }

    /// All documents carrying every static property of `storage`, ordered by id.
    ///
    /// # Errors
    /// Adapter I/O or decoding errors.
    pub async fn query(&self, storage: &StorageConfig) -> Result<Vec<Row>, StoreError> {
        match self {
            Self::Memory(adapter) => adapter.query(storage),
            Self::File(adapter) => adapter.query(storage).await,
        }
    }
}

impl From<MemoryAdapter> for DocumentStore {
    fn from(adapter: MemoryAdapter) -> Self {
        Self::Memory(adapter)
    }
}

impl From<FileAdapter> for DocumentStore {
    fn from(adapter: FileAdapter) -> Self {
        Self::File(adapter)
    }
}
