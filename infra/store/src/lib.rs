//! # Document store
//!
//! Adapters persisting model documents for the ToDoLite data layer.
//!
//! * [`MemoryAdapter`]: process-local documents behind a `parking_lot` lock.
//! * [`FileAdapter`]: one directory per database, one JSON file per document, written
//!   atomically and optionally LZ4-compressed.
//! * [`DocumentStore`]: the opened store of either kind.
//! * [`AdapterRegistry`]: resolves a model's [`StorageConfig`](tdl_model::StorageConfig)
//!   to a shared [`DocumentStore`].
//!
//! Saving a document merges the owning type's static properties over the user fields,
//! assigns an `_id` when missing and bumps `_rev` (`<generation>-<suffix>`). Queries
//! return only documents carrying every static property of the type.

mod error;
mod file;
mod maintenance;
mod memory;
mod registry;
mod row;
mod security;
mod store;

pub use error::{StoreError, StoreErrorExt};
pub use file::{Compression, FileAdapter};
pub use memory::MemoryAdapter;
pub use registry::AdapterRegistry;
pub use row::Row;
pub use store::DocumentStore;
