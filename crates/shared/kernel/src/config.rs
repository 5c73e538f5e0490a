use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment prefix for configuration overrides.
pub const ENV_PREFIX: &str = "TODOLITE";
/// File stem probed when no explicit config path is given.
pub const DEFAULT_CONFIG_STEM: &str = "todolite";

/// Errors raised while loading configuration.
#[tdl_derive::tdl_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration: an optional file overlaid by environment variables.
///
/// 1. **File**: when `path` is given it must exist; its format is inferred from the
///    extension (TOML, JSON, YAML...). Without a path, `todolite.*` in the working
///    directory is used if present.
/// 2. **Environment**: variables prefixed with `TODOLITE__` override file values; nested
///    keys use `__` (e.g. `TODOLITE__DATABASE__ADAPTER=file` maps to `database.adapter`).
///
/// Fields missing from every source fall back to the target type's serde defaults.
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing or unreadable, or if
/// the merged sources do not deserialize into `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, None)
}

/// [`load_config`] with an explicit environment map in place of the process environment.
fn load_layered<T>(
    path: Option<impl AsRef<Path>>,
    environment: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (source, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_STEM), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(source.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake)
                .source(environment),
        );

    info!(path = %source.display(), required, "Loading configuration");

    builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tdl_domain::config::{AdapterKind, AppConfig};

    #[test]
    #[serial]
    fn explicit_missing_file_fails() {
        let err = load_config::<AppConfig>(Some("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Config { context: Some(_), .. }));
    }

    #[test]
    #[serial]
    fn toml_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todolite.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[database]\nadapter = \"file\"\nname = \"todos\"\n").unwrap();

        let cfg: AppConfig = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.database.adapter, AdapterKind::File);
        assert_eq!(cfg.database.name, "todos");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    #[serial]
    fn environment_strings_fill_typed_fields() {
        let environment = Map::from_iter([
            ("TODOLITE__DATABASE__ADAPTER".to_owned(), "file".to_owned()),
            ("TODOLITE__DATABASE__COMPRESSION".to_owned(), "true".to_owned()),
            ("TODOLITE__LOGGING__JSON".to_owned(), "true".to_owned()),
            ("TODOLITE__LOGGING__LEVEL".to_owned(), "debug".to_owned()),
        ]);

        let cfg: AppConfig = load_layered(None::<&Path>, Some(environment)).unwrap();
        assert_eq!(cfg.database.adapter, AdapterKind::File);
        assert!(cfg.database.compression);
        assert!(cfg.logging.json);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.database.name, "todolite");
    }
}
