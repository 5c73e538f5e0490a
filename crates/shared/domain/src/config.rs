use serde::Deserialize;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
///
/// Deserializes straight through [`AppConfigInner`], so loosely typed sources (string
/// environment values such as `"true"`) reach each field's own deserializer.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(from = "AppConfigInner")]
pub struct AppConfig {
    inner: Arc<AppConfigInner>,
}

impl From<AppConfigInner> for AppConfig {
    fn from(inner: AppConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Document-store adapter implementations known to the data layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Process-local, non-persistent documents.
    #[default]
    Memory,
    /// JSON documents on the local filesystem.
    File,
}

impl AdapterKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an adapter name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAdapter(pub String);

impl fmt::Display for UnknownAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown document-store adapter '{}'", self.0)
    }
}

impl std::error::Error for UnknownAdapter {}

impl FromStr for AdapterKind {
    type Err = UnknownAdapter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "file" | "fs" => Ok(Self::File),
            _ => Err(UnknownAdapter(s.to_owned())),
        }
    }
}

/// Local document database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub adapter: AdapterKind,
    /// Logical database name every registered document type is stored in.
    pub name: String,
    /// Root directory for file-backed adapters.
    pub root: PathBuf,
    /// LZ4-compress documents on disk.
    pub compression: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Directory for rolling log files. Console only when unset.
    pub directory: Option<PathBuf>,
    /// Emit JSON lines to the log file.
    pub json: bool,
}

// --- Default ---

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterKind::Memory,
            name: "todolite".to_owned(),
            root: PathBuf::from("data"),
            compression: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}
