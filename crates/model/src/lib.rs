//! # Models
//!
//! The model layer of the ToDoLite data store.
//!
//! * [`Model`] / [`ModelClass`]: the capability set of model instances and the
//!   constructors that build them.
//! * [`CollectionClass`] / [`RowMapper`]: collections and their optional `map_row`
//!   capability, which turns a stored [`RawRow`] into a model instance.
//! * [`Descriptor`]: the static definition of one document type (storage settings,
//!   static properties, extension hooks).
//! * [`ModelRegistry`]: registered definitions keyed by model name, frozen after startup.
//!
//! Extension hooks compose: they receive a class and return a wrapped one, never
//! mutating shared state.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tdl_domain::config::AdapterKind;
//! use tdl_model::{Descriptor, ModelRegistry, StorageConfig};
//!
//! let descriptor = Descriptor::builder("Task")
//!     .storage(StorageConfig::new(AdapterKind::Memory, "todolite").static_property("type", json!("task")))
//!     .build()?;
//!
//! let registry = ModelRegistry::builder().register(descriptor)?.build();
//! let tasks = registry.get("Task")?;
//!
//! let row = json!({ "documentProperties": { "title": "Buy milk", "done": false } });
//! let task = tasks.map_row(&row)?;
//! assert_eq!(task.get("title"), Some(&json!("Buy milk")));
//! # Ok::<(), tdl_model::ModelError>(())
//! ```

mod collection;
mod descriptor;
mod error;
mod model;
mod registry;

pub use collection::{
    CollectionClass, CollectionClassRef, DOCUMENT_PROPERTIES_KEY, DocumentCollection,
    MappedCollection, RawRow, RowMapper, construct_from_row, document_properties,
    with_row_mapper,
};
pub use descriptor::{CollectionExtender, Descriptor, DescriptorBuilder, ModelExtender, StorageConfig};
pub use error::{ModelError, ModelErrorExt};
pub use model::{Document, DocumentClass, Model, ModelClass, ModelClassRef, Properties};
pub use registry::{ModelRegistry, ModelRegistryBuilder, RegisteredType};
