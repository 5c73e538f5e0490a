//! Path resolution for the file adapter.
//!
//! Database names and document ids are validated to a safe alphabet before they become
//! path segments, and every resolved path is re-checked against the sandbox root.

use crate::error::StoreError;
use crate::row::validate_id;
use std::path::{Component, Path, PathBuf};

/// Longest accepted database name.
const MAX_DATABASE_LEN: usize = 64;

/// Database names become directory names: `[a-z0-9_-]`, at most 64 characters.
pub(crate) fn validate_database(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name.len() > MAX_DATABASE_LEN {
        return Err(StoreError::Validation {
            message: format!("database name must be 1..={MAX_DATABASE_LEN} characters").into(),
            context: Some(name.to_owned().into()),
        });
    }
    if !name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(StoreError::PathTraversal {
            message: name.to_owned().into(),
            context: Some("Database name contains illegal characters".into()),
        });
    }
    Ok(())
}

/// Physical path of one document: `<db_dir>/<id[0..2]>/<id[2..4]>/<id>.<extension>`.
///
/// Ids shorter than four characters are stored unsharded.
pub(crate) fn document_path(
    db_dir: &Path,
    id: &str,
    extension: &str,
) -> Result<PathBuf, StoreError> {
    validate_id(id)?;

    let mut path = db_dir.to_path_buf();
    if let (Some(first), Some(second)) = (id.get(0..2), id.get(2..4)) {
        path.push(first);
        path.push(second);
    }
    path.push(format!("{id}.{extension}"));

    ensure_within(db_dir, &path)?;
    Ok(path)
}

/// Rejects any path that does not live under `root`.
pub(crate) fn ensure_within(root: &Path, path: &Path) -> Result<(), StoreError> {
    let escapes = path.components().any(|c| matches!(c, Component::ParentDir | Component::CurDir));
    if path.starts_with(root) && !escapes {
        Ok(())
    } else {
        Err(StoreError::PathTraversal {
            message: path.display().to_string().into(),
            context: Some("Path is outside sandbox boundaries".into()),
        })
    }
}
