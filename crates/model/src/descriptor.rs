//! Model definition descriptors.
//!
//! A [`Descriptor`] is the static definition of one document type: where its documents
//! are stored, which properties are stamped onto each of them, and the two hooks the
//! registry calls while building the type's model and collection classes.
//!
//! ```rust
//! use serde_json::json;
//! use tdl_domain::config::AdapterKind;
//! use tdl_model::{Descriptor, StorageConfig};
//!
//! let descriptor = Descriptor::builder("Profile")
//!     .storage(StorageConfig::new(AdapterKind::Memory, "todolite").static_property("type", json!("profile")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(descriptor.storage().static_properties()["type"], "profile");
//! ```

use crate::collection::CollectionClassRef;
use crate::error::ModelError;
use crate::model::{ModelClassRef, Properties};
use serde_json::Value;
use std::borrow::Cow;
use tdl_domain::config::AdapterKind;

/// Hook that augments a model class. Plain `fn` pointers hold no state between calls.
pub type ModelExtender = fn(ModelClassRef) -> ModelClassRef;

/// Hook that augments a collection class.
pub type CollectionExtender = fn(CollectionClassRef) -> CollectionClassRef;

/// Where and how documents of one type are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    adapter: AdapterKind,
    database: String,
    static_properties: Properties,
}

impl StorageConfig {
    pub fn new(adapter: AdapterKind, database: impl Into<String>) -> Self {
        Self { adapter, database: database.into(), static_properties: Properties::new() }
    }

    /// Adds a property stamped onto every document of the type.
    #[must_use]
    pub fn static_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.static_properties.insert(key.into(), value);
        self
    }

    #[must_use]
    pub const fn adapter(&self) -> AdapterKind {
        self.adapter
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    #[must_use]
    pub const fn static_properties(&self) -> &Properties {
        &self.static_properties
    }

    /// Copies every static property into `properties`, overwriting same-named keys.
    pub fn stamp(&self, properties: &mut Properties) {
        for (key, value) in &self.static_properties {
            properties.insert(key.clone(), value.clone());
        }
    }

    /// Whether `properties` carries every static property of this type.
    #[must_use]
    pub fn matches(&self, properties: &Properties) -> bool {
        self.static_properties.iter().all(|(key, value)| properties.get(key) == Some(value))
    }
}

/// Static definition of one document type.
///
/// Fields are private: once built, a descriptor is only read.
#[derive(Debug, Clone)]
pub struct Descriptor {
    name: Cow<'static, str>,
    storage: StorageConfig,
    model_extender: Option<ModelExtender>,
    collection_extender: Option<CollectionExtender>,
}

impl Descriptor {
    pub fn builder(name: impl Into<Cow<'static, str>>) -> DescriptorBuilder {
        DescriptorBuilder {
            name: name.into(),
            storage: None,
            model_extender: None,
            collection_extender: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Runs the model hook over `base`, or returns `base` when there is none.
    #[must_use]
    pub fn extend_model(&self, base: ModelClassRef) -> ModelClassRef {
        match self.model_extender {
            Some(extend) => extend(base),
            None => base,
        }
    }

    /// Runs the collection hook over `base`, or returns `base` when there is none.
    #[must_use]
    pub fn extend_collection(&self, base: CollectionClassRef) -> CollectionClassRef {
        match self.collection_extender {
            Some(extend) => extend(base),
            None => base,
        }
    }
}

/// Fluent builder for a [`Descriptor`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct DescriptorBuilder {
    name: Cow<'static, str>,
    storage: Option<StorageConfig>,
    model_extender: Option<ModelExtender>,
    collection_extender: Option<CollectionExtender>,
}

impl DescriptorBuilder {
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn extend_model(mut self, extender: ModelExtender) -> Self {
        self.model_extender = Some(extender);
        self
    }

    pub fn extend_collection(mut self, extender: CollectionExtender) -> Self {
        self.collection_extender = Some(extender);
        self
    }

    /// Validates and freezes the definition.
    ///
    /// # Errors
    /// [`ModelError::Validation`] when the name is blank, storage is missing, or the
    /// database name is blank.
    pub fn build(self) -> Result<Descriptor, ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation {
                message: "descriptor name cannot be empty".into(),
                context: None,
            });
        }
        let storage = self.storage.ok_or_else(|| ModelError::Validation {
            message: "storage configuration is required".into(),
            context: Some(self.name.clone()),
        })?;
        if storage.database.trim().is_empty() {
            return Err(ModelError::Validation {
                message: "database name cannot be empty".into(),
                context: Some(self.name),
            });
        }

        Ok(Descriptor {
            name: self.name,
            storage,
            model_extender: self.model_extender,
            collection_extender: self.collection_extender,
        })
    }
}
