use crate::collection::BoundCollection;
use crate::error::TodoliteError;
use crate::features;
use fxhash::FxHashMap;
use std::path::Path;
use std::sync::Arc;
use tdl_domain::config::AppConfig;
use tdl_kernel::config::load_config;
use tdl_model::ModelRegistry;
use tdl_store::{AdapterRegistry, DocumentStore};
use tracing::{info, instrument};

#[derive(Debug)]
struct TodoliteInner {
    config: AppConfig,
    models: ModelRegistry,
    adapters: AdapterRegistry,
    stores: FxHashMap<String, DocumentStore>,
}

/// The initialized data layer: registered document types and their opened stores.
#[derive(Debug, Clone)]
pub struct Todolite {
    inner: Arc<TodoliteInner>,
}

impl Todolite {
    /// Loads the application config: `path` (or `todolite.*` when absent) overlaid by
    /// `TODOLITE__` environment variables.
    ///
    /// # Errors
    /// [`TodoliteError::Config`] if an explicit file is missing or the sources do not
    /// form a valid configuration.
    pub fn load_config(path: Option<&Path>) -> Result<AppConfig, TodoliteError> {
        Ok(load_config(path)?)
    }

    /// Registers every compiled-in document type and opens its store.
    ///
    /// # Errors
    /// [`TodoliteError::Model`] for invalid or duplicate definitions,
    /// [`TodoliteError::Store`] if a store cannot be opened.
    pub async fn init(config: &AppConfig) -> Result<Self, TodoliteError> {
        let mut builder = ModelRegistry::builder();
        for descriptor in features::definitions(&config.database)? {
            builder = builder.register(descriptor)?;
        }
        Self::with_models(config, builder.build()).await
    }

    /// Opens stores for an already built registry.
    ///
    /// # Errors
    /// [`TodoliteError::Store`] if a store cannot be opened.
    #[instrument(skip_all, fields(adapter = %config.database.adapter))]
    pub async fn with_models(
        config: &AppConfig,
        models: ModelRegistry,
    ) -> Result<Self, TodoliteError> {
        let adapters = AdapterRegistry::from_config(&config.database);
        let mut stores = FxHashMap::default();
        for kind in models.iter() {
            let store = adapters.open(kind.descriptor().storage()).await?;
            stores.insert(kind.descriptor().name().to_owned(), store);
        }

        info!(
            models = models.len(),
            stores = adapters.len(),
            features = ?features::ENABLED,
            "Data layer ready"
        );

        Ok(Self {
            inner: Arc::new(TodoliteInner { config: config.clone(), models, adapters, stores }),
        })
    }

    /// The collection of the document type registered as `name`.
    ///
    /// # Errors
    /// [`TodoliteError::Model`] wrapping [`tdl_model::ModelError::NotFound`] for unknown
    /// names.
    pub fn collection(&self, name: &str) -> Result<BoundCollection<'_>, TodoliteError> {
        let kind = self.inner.models.get(name)?;
        let store = self.inner.stores.get(name).ok_or_else(|| TodoliteError::Internal {
            message: format!("no store bound for '{name}'").into(),
            context: None,
        })?;
        Ok(BoundCollection::new(kind, store))
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn models(&self) -> &ModelRegistry {
        &self.inner.models
    }

    #[must_use]
    pub fn adapters(&self) -> &AdapterRegistry {
        &self.inner.adapters
    }
}
