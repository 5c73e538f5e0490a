//! Process-wide registry of model definitions.
//!
//! Definitions are registered once through [`ModelRegistryBuilder`]; [`ModelRegistryBuilder::build`]
//! freezes them into a [`ModelRegistry`] that is cheap to clone and safe to read from any thread.

use crate::collection::{CollectionClassRef, DocumentCollection, RawRow, construct_from_row};
use crate::descriptor::Descriptor;
use crate::error::ModelError;
use crate::model::{DocumentClass, Model, ModelClassRef, Properties};
use fxhash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A registered document type: its descriptor plus the classes built from it.
#[derive(Debug)]
pub struct RegisteredType {
    descriptor: Arc<Descriptor>,
    model: ModelClassRef,
    collection: CollectionClassRef,
}

impl RegisteredType {
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn model(&self) -> &ModelClassRef {
        &self.model
    }

    #[must_use]
    pub const fn collection(&self) -> &CollectionClassRef {
        &self.collection
    }

    /// Builds a new, not yet persisted, instance with the type's static properties stamped on.
    ///
    /// # Errors
    /// Whatever the model constructor returns.
    pub fn instantiate(&self, mut properties: Properties) -> Result<Box<dyn Model>, ModelError> {
        self.descriptor.storage().stamp(&mut properties);
        self.model.construct(properties)
    }

    /// Maps a stored row through the collection's `map_row` capability.
    ///
    /// Collections without the capability build the instance straight from the row's
    /// properties.
    ///
    /// # Errors
    /// [`ModelError::InvalidRow`] for rows without document properties; constructor
    /// errors are passed through unchanged.
    pub fn map_row(&self, row: &dyn RawRow) -> Result<Box<dyn Model>, ModelError> {
        match self.collection.row_mapper() {
            Some(mapper) => mapper.map_row(self.model.as_ref(), row),
            None => construct_from_row(self.model.as_ref(), row),
        }
    }
}

/// Collects model definitions before the registry is frozen.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ModelRegistryBuilder {
    types: FxHashMap<String, RegisteredType>,
}

impl ModelRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `descriptor` over the base document classes.
    ///
    /// # Errors
    /// [`ModelError::Duplicate`] if the name is already taken.
    pub fn register(self, descriptor: Descriptor) -> Result<Self, ModelError> {
        let model = DocumentClass::shared(descriptor.name().to_owned());
        let collection = DocumentCollection::shared(descriptor.name().to_owned());
        self.register_with(descriptor, model, collection)
    }

    /// Registers `descriptor` over explicitly supplied base classes.
    ///
    /// Each extender runs exactly once, here.
    ///
    /// # Errors
    /// [`ModelError::Duplicate`] if the name is already taken.
    pub fn register_with(
        mut self,
        descriptor: Descriptor,
        model: ModelClassRef,
        collection: CollectionClassRef,
    ) -> Result<Self, ModelError> {
        let name = descriptor.name().to_owned();
        if self.types.contains_key(&name) {
            return Err(ModelError::Duplicate { message: name.into(), context: None });
        }

        let model = descriptor.extend_model(model);
        let collection = descriptor.extend_collection(collection);
        debug!(
            model = %name,
            map_row = collection.row_mapper().is_some(),
            "Model and collection classes built"
        );

        let storage = descriptor.storage();
        info!(
            model = %name,
            adapter = %storage.adapter(),
            database = storage.database(),
            "Registered model definition"
        );

        self.types.insert(
            name,
            RegisteredType { descriptor: Arc::new(descriptor), model, collection },
        );
        Ok(self)
    }

    pub fn build(self) -> ModelRegistry {
        ModelRegistry { types: Arc::new(self.types) }
    }
}

/// Frozen, shareable set of registered document types keyed by model name.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    types: Arc<FxHashMap<String, RegisteredType>>,
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::new()
    }

    /// Looks up a registered type.
    ///
    /// # Errors
    /// [`ModelError::NotFound`] for unknown names.
    pub fn get(&self, name: &str) -> Result<&RegisteredType, ModelError> {
        self.types.get(name).ok_or_else(|| ModelError::NotFound {
            message: name.to_owned().into(),
            context: None,
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered model names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredType> {
        self.types.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
