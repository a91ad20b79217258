use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use crate::config::{CacheBackend, ConfigFormat, KernelConfig};
use crate::kernel::error::Error;

#[test]
fn test_defaults() {
    let config = KernelConfig::default();

    assert_eq!(config.env_file, PathBuf::from(".env"));
    assert_eq!(config.cache.backend, CacheBackend::File);
    assert_eq!(config.cache.directory, PathBuf::from("var/cache"));
}

#[test]
fn test_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("tern.json")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("tern.JSON")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("tern.ini")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("tern")), None);
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = KernelConfig::parse(r#"{ "cache": { "backend": "memory" } }"#, ConfigFormat::Json).unwrap();

    assert_eq!(config.cache.backend, CacheBackend::Memory);
    assert_eq!(config.cache.directory, PathBuf::from("var/cache"));
    assert_eq!(config.env_file, PathBuf::from(".env"));
}

#[cfg(feature = "toml-config")]
#[test]
fn test_load_toml_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("tern.toml");
    fs::write(&path, "env_file = \"config/.env\"\n\n[cache]\ndirectory = \"/tmp/tern-cache\"\n").unwrap();

    let config = KernelConfig::load(&path).unwrap();

    assert_eq!(config.env_file, PathBuf::from("config/.env"));
    assert_eq!(config.cache.directory, PathBuf::from("/tmp/tern-cache"));
    assert_eq!(config.cache.backend, CacheBackend::File);
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_load_yaml_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("tern.yml");
    fs::write(&path, "cache:\n  backend: memory\n").unwrap();

    let config = KernelConfig::load(&path).unwrap();

    assert_eq!(config.cache.backend, CacheBackend::Memory);
}

#[test]
fn test_unknown_extension_is_config_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("tern.ini");
    fs::write(&path, "x=1").unwrap();

    assert!(matches!(KernelConfig::load(&path), Err(Error::Config { .. })));
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("tern.json");
    fs::write(&path, "{ nope").unwrap();

    match KernelConfig::load(&path) {
        Err(Error::Config { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected config error, got {:?}", other),
    }
}

#[test]
fn test_load_or_default_without_path() {
    assert_eq!(KernelConfig::load_or_default(None).unwrap(), KernelConfig::default());
}
