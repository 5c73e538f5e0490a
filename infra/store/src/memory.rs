use crate::error::StoreError;
use crate::row::{Row, prepare, resolve_id, validate_id};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tdl_domain::constants::REV_KEY;
use tdl_model::{Properties, StorageConfig};
use tracing::debug;

#[derive(Debug)]
struct MemoryInner {
    database: String,
    documents: RwLock<FxHashMap<String, Properties>>,
}

/// Process-local document adapter. Contents vanish with the last handle.
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    inner: Arc<MemoryInner>,
}

impl MemoryAdapter {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                database: database.into(),
                documents: RwLock::new(FxHashMap::default()),
            }),
        }
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.inner.database
    }

    pub(crate) fn save(
        &self,
        storage: &StorageConfig,
        properties: Properties,
    ) -> Result<Row, StoreError> {
        let id = resolve_id(&properties)?;

        let mut documents = self.inner.documents.write();
        let previous =
            documents.get(&id).and_then(|doc| doc.get(REV_KEY)).and_then(Value::as_str);
        let stored = prepare(storage, properties, &id, previous);
        documents.insert(id.clone(), stored.clone());
        drop(documents);

        debug!(database = %self.inner.database, %id, "Document saved in memory");
        Row::from_stored(stored)
    }

    pub(crate) fn get(&self, id: &str) -> Result<Option<Row>, StoreError> {
        validate_id(id)?;
        self.inner.documents.read().get(id).cloned().map(Row::from_stored).transpose()
    }

    pub(crate) fn delete(&self, id: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        if self.inner.documents.write().remove(id).is_none() {
            return Err(StoreError::NotFound { message: id.to_owned().into(), context: None });
        }
        debug!(database = %self.inner.database, %id, "Document deleted from memory");
        Ok(())
    }

    pub(crate) fn query(&self, storage: &StorageConfig) -> Result<Vec<Row>, StoreError> {
        let mut rows = self
            .inner
            .documents
            .read()
            .values()
            .filter(|doc| storage.matches(doc))
            .cloned()
            .map(Row::from_stored)
            .collect::<Result<Vec<_>, _>>()?;
        rows.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(rows)
    }
}
