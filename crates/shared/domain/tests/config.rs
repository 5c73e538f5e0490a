use serde_json::json;
use std::path::PathBuf;
use tdl_domain::config::{AdapterKind, AppConfig, DatabaseConfig, LoggingConfig};

#[test]
fn config_defaults_are_sane() {
    let db = DatabaseConfig::default();
    assert_eq!(db.adapter, AdapterKind::Memory);
    assert_eq!(db.name, "todolite");
    assert_eq!(db.root, PathBuf::from("data"));
    assert!(!db.compression);

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.directory.is_none());
}

#[test]
fn app_config_deserializes() {
    let raw = json!({
        "database": { "adapter": "file", "name": "todos", "root": "/tmp/todolite", "compression": true },
        "logging": { "level": "debug" }
    });

    let cfg: AppConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.database.adapter, AdapterKind::File);
    assert_eq!(cfg.database.name, "todos");
    assert_eq!(cfg.database.root, PathBuf::from("/tmp/todolite"));
    assert!(cfg.database.compression);
    assert_eq!(cfg.logging.level, "debug");
    assert!(!cfg.logging.json);
}

#[test]
fn unknown_adapter_is_rejected() {
    let raw = json!({ "database": { "adapter": "titouchdb" } });
    assert!(serde_json::from_value::<AppConfig>(raw).is_err());
}

#[test]
fn adapter_kind_parses_aliases() {
    assert_eq!("memory".parse::<AdapterKind>(), Ok(AdapterKind::Memory));
    assert_eq!(" FS ".parse::<AdapterKind>(), Ok(AdapterKind::File));
    assert!("couch".parse::<AdapterKind>().is_err());
    assert_eq!(AdapterKind::File.to_string(), "file");
}

#[test]
fn deref_mut_copies_on_write() {
    let original = AppConfig::default();
    let mut edited = original.clone();
    edited.database.name = "other".to_owned();

    assert_eq!(original.database.name, "todolite");
    assert_eq!(edited.database.name, "other");
}
