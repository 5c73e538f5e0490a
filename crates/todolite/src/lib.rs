//! Facade crate for the ToDoLite data layer.
//! Re-exports the shared crates and wires compiled-in document types to their stores.
//! Keep this crate thin: it composes the model, store and feature crates.
//!
//! ## Usage
//! ```rust
//! use todolite::Todolite;
//! use todolite::domain::config::AppConfig;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), todolite::TodoliteError> {
//! let app = Todolite::init(&AppConfig::default()).await?;
//! let profiles = app.collection("Profile")?;
//! assert!(profiles.fetch().await?.is_empty());
//! # Ok(())
//! # }
//! ```

mod app;
mod collection;
mod error;

pub use crate::app::Todolite;
pub use crate::collection::BoundCollection;
pub use crate::error::{TodoliteError, TodoliteErrorExt};
pub use tdl_domain as domain;
pub use tdl_kernel as kernel;
pub use tdl_model as model;
pub use tdl_store as store;

/// Compiled-in document types.
pub mod features {
    use tdl_domain::config::DatabaseConfig;
    use tdl_model::{Descriptor, ModelError};
    #[cfg(feature = "profile")]
    pub use tdl_profile as profile;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "profile")]
        "profile",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }

    /// Definitions of every enabled document type for the configured database.
    ///
    /// # Errors
    /// Whatever a feature's definition returns.
    #[cfg_attr(not(feature = "profile"), allow(unused_variables, unused_mut))]
    pub fn definitions(database: &DatabaseConfig) -> Result<Vec<Descriptor>, ModelError> {
        let mut definitions = Vec::new();

        #[cfg(feature = "profile")]
        definitions.push(profile::definition(database)?);

        Ok(definitions)
    }
}
