//! Collection capabilities and the row-mapping extension point.

use crate::error::ModelError;
use crate::model::{Model, ModelClass, Properties};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Shared handle to a collection class.
pub type CollectionClassRef = Arc<dyn CollectionClass>;

/// Key under which raw JSON rows carry their document properties.
pub const DOCUMENT_PROPERTIES_KEY: &str = "documentProperties";

/// An opaque handle to one persisted document.
pub trait RawRow {
    /// The stored document properties, or `None` when the row has no readable body.
    fn document_properties(&self) -> Option<&Properties>;
}

/// Raw rows as JSON: `{ "documentProperties": { ... } }`.
impl RawRow for Value {
    fn document_properties(&self) -> Option<&Properties> {
        self.get(DOCUMENT_PROPERTIES_KEY).and_then(Value::as_object)
    }
}

/// Turns raw rows into model instances.
pub trait RowMapper: Debug + Send + Sync {
    /// Builds an instance of `model` from `row`.
    ///
    /// # Errors
    /// [`ModelError::InvalidRow`] when the row has no document properties; errors from
    /// the model constructor are returned unchanged.
    fn map_row(&self, model: &dyn ModelClass, row: &dyn RawRow)
    -> Result<Box<dyn Model>, ModelError>;
}

/// Capabilities of a collection class.
pub trait CollectionClass: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// The `map_row` capability, present only on extended collections.
    fn row_mapper(&self) -> Option<&dyn RowMapper> {
        None
    }
}

/// The base collection class. It carries no row mapper.
#[derive(Debug, Clone)]
pub struct DocumentCollection {
    name: Arc<str>,
}

impl DocumentCollection {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    pub fn shared(name: impl Into<Arc<str>>) -> CollectionClassRef {
        Arc::new(Self::new(name))
    }
}

impl CollectionClass for DocumentCollection {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A collection class composed with a row mapper.
#[derive(Debug)]
pub struct MappedCollection<M> {
    base: CollectionClassRef,
    mapper: M,
}

impl<M: RowMapper> CollectionClass for MappedCollection<M> {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn row_mapper(&self) -> Option<&dyn RowMapper> {
        Some(&self.mapper)
    }
}

/// Wraps `base` so it exposes `mapper` as its `map_row` capability.
pub fn with_row_mapper<M>(base: CollectionClassRef, mapper: M) -> CollectionClassRef
where
    M: RowMapper + 'static,
{
    Arc::new(MappedCollection { base, mapper })
}

/// Reads a row's document properties.
///
/// # Errors
/// [`ModelError::InvalidRow`] when the row has none.
pub fn document_properties(row: &dyn RawRow) -> Result<&Properties, ModelError> {
    row.document_properties().ok_or_else(|| ModelError::InvalidRow {
        message: "row has no readable document properties".into(),
        context: None,
    })
}

/// Builds an instance straight from a row's properties, with no customisation.
///
/// # Errors
/// See [`RowMapper::map_row`].
pub fn construct_from_row(
    model: &dyn ModelClass,
    row: &dyn RawRow,
) -> Result<Box<dyn Model>, ModelError> {
    let properties = document_properties(row)?;
    model.construct(properties.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentClass;
    use serde_json::json;

    #[derive(Debug)]
    struct Passthrough;

    impl RowMapper for Passthrough {
        fn map_row(
            &self,
            model: &dyn ModelClass,
            row: &dyn RawRow,
        ) -> Result<Box<dyn Model>, ModelError> {
            construct_from_row(model, row)
        }
    }

    #[test]
    fn json_rows_expose_their_properties() {
        let row = json!({ "documentProperties": { "title": "x" } });
        assert_eq!(row.document_properties().and_then(|p| p.get("title")), Some(&json!("x")));

        assert!(json!({}).document_properties().is_none());
        assert!(json!({ "documentProperties": 7 }).document_properties().is_none());
        assert!(json!([1, 2]).document_properties().is_none());
    }

    #[test]
    fn mapped_collection_keeps_base_name() {
        let base = DocumentCollection::shared("Tasks");
        assert!(base.row_mapper().is_none());

        let extended = with_row_mapper(Arc::clone(&base), Passthrough);
        assert_eq!(extended.name(), "Tasks");
        assert!(extended.row_mapper().is_some());
        assert!(base.row_mapper().is_none());
    }

    #[test]
    fn construct_from_row_rejects_bodiless_rows() {
        let err = construct_from_row(&DocumentClass::new("Task"), &json!({})).unwrap_err();
        assert!(matches!(err, ModelError::InvalidRow { .. }));
    }
}
