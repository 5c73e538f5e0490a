//! Profile feature slice: the definition of user profile documents.
//!
//! Profiles live in the configured database next to lists and tasks, and are told
//! apart from them by the static `type = "profile"` property stamped on every save.

use serde_json::Value;
use tdl_domain::config::DatabaseConfig;
use tdl_domain::constants::{PROFILE, PROFILE_MODEL, TYPE_KEY};
use tdl_model::{
    CollectionClassRef, Descriptor, Model, ModelClass, ModelClassRef, ModelError, RawRow,
    RowMapper, StorageConfig, document_properties, with_row_mapper,
};

/// Builds the `Profile` model definition for the configured database.
///
/// # Errors
/// [`ModelError::Validation`] if the configured database name is empty.
pub fn definition(database: &DatabaseConfig) -> Result<Descriptor, ModelError> {
    let storage = StorageConfig::new(database.adapter, database.name.clone())
        .static_property(TYPE_KEY, Value::String(PROFILE.to_owned()));

    Descriptor::builder(PROFILE_MODEL)
        .storage(storage)
        .extend_model(extend_model)
        .extend_collection(extend_collection)
        .build()
}

/// Profiles add no model behavior.
#[must_use]
pub fn extend_model(model: ModelClassRef) -> ModelClassRef {
    model
}

/// Gives the profile collection its `map_row` capability.
#[must_use]
pub fn extend_collection(collection: CollectionClassRef) -> CollectionClassRef {
    with_row_mapper(collection, ProfileRows)
}

/// Maps stored rows to profile instances, keeping every stored property.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileRows;

impl RowMapper for ProfileRows {
    fn map_row(
        &self,
        model: &dyn ModelClass,
        row: &dyn RawRow,
    ) -> Result<Box<dyn Model>, ModelError> {
        let properties = document_properties(row)?;
        let profile = model.construct(properties.clone())?;
        tracing::trace!(id = profile.id(), "Profile row mapped");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tdl_domain::config::AdapterKind;
    use tdl_model::{CollectionClass, DocumentClass, DocumentCollection};

    #[test]
    fn definition_follows_database_config() {
        let config = DatabaseConfig { adapter: AdapterKind::File, ..DatabaseConfig::default() };
        let descriptor = definition(&config).unwrap();

        assert_eq!(descriptor.name(), "Profile");
        assert_eq!(descriptor.storage().adapter(), AdapterKind::File);
        assert_eq!(descriptor.storage().database(), "todolite");
        assert_eq!(descriptor.storage().static_properties().len(), 1);
        assert_eq!(descriptor.storage().static_properties()["type"], "profile");
    }

    #[test]
    fn empty_database_name_is_rejected() {
        let config = DatabaseConfig { name: String::new(), ..DatabaseConfig::default() };
        assert!(matches!(definition(&config), Err(ModelError::Validation { .. })));
    }

    #[test]
    fn model_extender_is_a_passthrough() {
        let base = DocumentClass::shared("Profile");
        let extended = extend_model(Arc::clone(&base));
        assert!(Arc::ptr_eq(&base, &extended));
    }

    #[test]
    fn collection_extender_adds_row_mapping() {
        let base = DocumentCollection::shared("Profile");
        assert!(base.row_mapper().is_none());

        let extended = extend_collection(base);
        assert_eq!(extended.name(), "Profile");
        assert!(extended.row_mapper().is_some());
    }
}
