//! The base model capability set and its document-backed implementation.

use crate::error::ModelError;
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Arc;
use tdl_domain::constants::{ID_KEY, REV_KEY};

/// Ordered key/value properties of one document.
pub type Properties = Map<String, Value>;

/// Shared handle to a model class.
pub type ModelClassRef = Arc<dyn ModelClass>;

/// Capabilities every model instance offers.
pub trait Model: Debug + Send + Sync {
    /// Name of the model class that built this instance.
    fn type_name(&self) -> &str;

    /// All readable properties.
    fn properties(&self) -> &Properties;

    /// Mutable access to the properties.
    fn properties_mut(&mut self) -> &mut Properties;

    fn get(&self, key: &str) -> Option<&Value> {
        self.properties().get(key)
    }

    /// Sets a property, returning the previous value.
    fn set(&mut self, key: &str, value: Value) -> Option<Value> {
        self.properties_mut().insert(key.to_owned(), value)
    }

    /// Document identifier, once the instance has been persisted.
    fn id(&self) -> Option<&str> {
        self.get(ID_KEY).and_then(Value::as_str)
    }

    /// Current document revision, once the instance has been persisted.
    fn revision(&self) -> Option<&str> {
        self.get(REV_KEY).and_then(Value::as_str)
    }

    /// Snapshot of the instance as a JSON object.
    fn to_json(&self) -> Value {
        Value::Object(self.properties().clone())
    }
}

/// A constructor for model instances.
///
/// Extenders receive and return `ModelClassRef`s; an extension wraps the base class
/// rather than mutating it, so two extensions of distinct bases never share state.
pub trait ModelClass: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Builds a new instance from document properties.
    ///
    /// # Errors
    /// Implementations return [`ModelError::Construct`] for properties they reject.
    fn construct(&self, properties: Properties) -> Result<Box<dyn Model>, ModelError>;
}

/// Plain model instance backed by its document properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    type_name: Arc<str>,
    properties: Properties,
}

impl Document {
    pub fn new(type_name: impl Into<Arc<str>>, properties: Properties) -> Self {
        Self { type_name: type_name.into(), properties }
    }
}

impl Model for Document {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

/// The base model class: builds [`Document`]s without touching their properties.
#[derive(Debug, Clone)]
pub struct DocumentClass {
    name: Arc<str>,
}

impl DocumentClass {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Shorthand for a shared handle.
    pub fn shared(name: impl Into<Arc<str>>) -> ModelClassRef {
        Arc::new(Self::new(name))
    }
}

impl ModelClass for DocumentClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn construct(&self, properties: Properties) -> Result<Box<dyn Model>, ModelError> {
        Ok(Box::new(Document::new(Arc::clone(&self.name), properties)))
    }
}
