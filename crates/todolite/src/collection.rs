use crate::error::TodoliteError;
use tdl_model::{Model, Properties, RegisteredType, StorageConfig};
use tdl_store::DocumentStore;
use tracing::{debug, instrument};

/// A registered document type bound to its opened store.
///
/// Every row read back from the store goes through the type's `map_row` capability.
#[derive(Debug, Clone, Copy)]
pub struct BoundCollection<'a> {
    kind: &'a RegisteredType,
    store: &'a DocumentStore,
}

impl<'a> BoundCollection<'a> {
    pub(crate) const fn new(kind: &'a RegisteredType, store: &'a DocumentStore) -> Self {
        Self { kind, store }
    }

    /// Model name of the bound type.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.kind.descriptor().name()
    }

    #[must_use]
    pub fn storage(&self) -> &'a StorageConfig {
        self.kind.descriptor().storage()
    }

    #[must_use]
    pub const fn store(&self) -> &'a DocumentStore {
        self.store
    }

    /// Builds a new instance from `properties` and persists it.
    ///
    /// # Errors
    /// [`TodoliteError::Model`] if construction fails, [`TodoliteError::Store`] if the
    /// write fails.
    #[instrument(skip_all, fields(model = self.name()))]
    pub async fn create(&self, properties: Properties) -> Result<Box<dyn Model>, TodoliteError> {
        let instance = self.kind.instantiate(properties)?;
        self.save(instance.as_ref()).await
    }

    /// Persists an instance, keeping its `_id` and bumping its `_rev`.
    ///
    /// # Errors
    /// [`TodoliteError::Store`] if the write fails; [`TodoliteError::Model`] if the saved
    /// row cannot be mapped back.
    pub async fn save(&self, instance: &dyn Model) -> Result<Box<dyn Model>, TodoliteError> {
        let row = self.store.save(self.storage(), instance.properties().clone()).await?;
        debug!(model = self.name(), id = row.id(), rev = row.rev(), "Document saved");
        Ok(self.kind.map_row(&row)?)
    }

    /// All documents of this type, ordered by id.
    ///
    /// # Errors
    /// [`TodoliteError::Store`] for adapter failures; [`TodoliteError::Model`] for rows
    /// the collection cannot map.
    pub async fn fetch(&self) -> Result<Vec<Box<dyn Model>>, TodoliteError> {
        let rows = self.store.query(self.storage()).await?;
        rows.iter().map(|row| self.kind.map_row(row).map_err(TodoliteError::from)).collect()
    }

    /// One document by id, if it exists and belongs to this type.
    ///
    /// # Errors
    /// See [`BoundCollection::fetch`].
    pub async fn get(&self, id: &str) -> Result<Option<Box<dyn Model>>, TodoliteError> {
        match self.store.get(id).await? {
            Some(row) if self.storage().matches(row.properties()) => {
                Ok(Some(self.kind.map_row(&row)?))
            },
            _ => Ok(None),
        }
    }

    /// Deletes one document of this type.
    ///
    /// # Errors
    /// [`TodoliteError::Store`] wrapping [`tdl_store::StoreError::NotFound`] when there
    /// is no such document of this type.
    #[instrument(skip(self), fields(model = self.name()))]
    pub async fn remove(&self, id: &str) -> Result<(), TodoliteError> {
        let owned = self
            .store
            .get(id)
            .await?
            .is_some_and(|row| self.storage().matches(row.properties()));
        if !owned {
            return Err(tdl_store::StoreError::NotFound {
                message: id.to_owned().into(),
                context: Some(format!("No {} document", self.name()).into()),
            }
            .into());
        }
        Ok(self.store.delete(id).await?)
    }
}
