use crate::error::StoreError;
use serde_json::Value;
use tdl_domain::constants::{ID_KEY, REV_KEY};
use tdl_kernel::safe_nanoid;
use tdl_model::{Properties, RawRow, StorageConfig};

/// Longest accepted document id.
const MAX_ID_LEN: usize = 128;

/// One stored document as returned by an adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: String,
    rev: String,
    properties: Properties,
}

impl Row {
    /// Rebuilds a row from stored properties, which must carry `_id` and `_rev`.
    pub(crate) fn from_stored(properties: Properties) -> Result<Self, StoreError> {
        let id = string_field(&properties, ID_KEY)?;
        let rev = string_field(&properties, REV_KEY)?;
        Ok(Self { id, rev, properties })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn rev(&self) -> &str {
        &self.rev
    }

    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    #[must_use]
    pub fn into_properties(self) -> Properties {
        self.properties
    }
}

impl RawRow for Row {
    fn document_properties(&self) -> Option<&Properties> {
        Some(&self.properties)
    }
}

fn string_field(properties: &Properties, key: &'static str) -> Result<String, StoreError> {
    properties.get(key).and_then(Value::as_str).map(str::to_owned).ok_or_else(|| {
        StoreError::Validation {
            message: format!("stored document has no string '{key}'").into(),
            context: None,
        }
    })
}

/// Reads the caller-supplied id, or assigns a fresh one.
pub(crate) fn resolve_id(properties: &Properties) -> Result<String, StoreError> {
    match properties.get(ID_KEY) {
        None | Some(Value::Null) => Ok(safe_nanoid!(16)),
        Some(Value::String(id)) => {
            validate_id(id)?;
            Ok(id.clone())
        },
        Some(other) => Err(StoreError::Validation {
            message: format!("'{ID_KEY}' must be a string, got {other}").into(),
            context: None,
        }),
    }
}

/// Ids double as file names, so only `[A-Za-z0-9_-]` is accepted.
pub(crate) fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() || id.len() > MAX_ID_LEN {
        return Err(StoreError::Validation {
            message: format!("document id must be 1..={MAX_ID_LEN} characters").into(),
            context: Some(id.to_owned().into()),
        });
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(StoreError::Validation {
            message: "document id contains illegal characters".into(),
            context: Some(id.to_owned().into()),
        });
    }
    Ok(())
}

/// Next revision after `previous`: `<generation>-<random suffix>`.
pub(crate) fn next_revision(previous: Option<&str>) -> String {
    let generation = previous
        .and_then(|rev| rev.split_once('-'))
        .and_then(|(generation, _)| generation.parse::<u64>().ok())
        .unwrap_or(0);
    format!("{}-{}", generation + 1, safe_nanoid!(10))
}

/// Produces the properties to persist: user fields, then static properties, then `_id`/`_rev`.
pub(crate) fn prepare(
    storage: &StorageConfig,
    mut properties: Properties,
    id: &str,
    previous_rev: Option<&str>,
) -> Properties {
    storage.stamp(&mut properties);
    properties.insert(ID_KEY.to_owned(), Value::String(id.to_owned()));
    properties.insert(REV_KEY.to_owned(), Value::String(next_revision(previous_rev)));
    properties
}
