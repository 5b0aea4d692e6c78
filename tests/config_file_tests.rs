//! Tests for loading `AppConfig` from YAML files on disk.

use graphql_service::config::{AppConfig, StorageBackend};
use graphql_service::core::ConfigError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_file() {
    let file = write_config(
        r#"
server:
  host: 0.0.0.0
  port: 9090
graphql:
  max_depth: 8
  playground: false
storage:
  backend: postgres
  url: postgres://localhost/app
  seed: false
"#,
    );

    let config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.server.addr(), "0.0.0.0:9090");
    assert_eq!(config.graphql.max_depth, 8);
    assert!(!config.graphql.playground);
    assert_eq!(config.storage.backend, StorageBackend::Postgres);
    assert_eq!(config.storage.url.as_deref(), Some("postgres://localhost/app"));
    assert!(!config.storage.should_seed());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config("server:\n  port: 4000\n");

    let config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.server.addr(), "127.0.0.1:4000");
    assert_eq!(config.graphql.max_depth, 5);
    assert_eq!(config.storage.backend, StorageBackend::InMemory);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = AppConfig::from_yaml_file(path.to_str().unwrap()).unwrap_err();
    match err {
        ConfigError::Io { path: reported, .. } => assert!(reported.ends_with("absent.yaml")),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_out_of_range_depth_in_file() {
    let file = write_config("graphql:\n  max_depth: 100\n");

    let err = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
