//! Unit tests for configuration loading and base URL resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate REVRADAR_API_URL are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use revradar_common::config::{
    resolve_api_base_url, LoggingConfig, TomlConfig, API_URL_ENV_VAR, DEFAULT_API_BASE_URL,
};
use revradar_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;

fn toml_with_url(url: &str) -> TomlConfig {
    TomlConfig {
        api_base_url: Some(url.to_string()),
        ..Default::default()
    }
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(API_URL_ENV_VAR);

    let url = resolve_api_base_url(None, &TomlConfig::default()).unwrap();
    assert_eq!(url, DEFAULT_API_BASE_URL);
}

#[test]
#[serial]
fn test_cli_overrides_env_and_toml() {
    env::set_var(API_URL_ENV_VAR, "http://env-host:9000");

    let url = resolve_api_base_url(Some("http://cli-host:7000/"), &toml_with_url("http://toml-host:6000")).unwrap();
    assert_eq!(url, "http://cli-host:7000");

    env::remove_var(API_URL_ENV_VAR);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    env::set_var(API_URL_ENV_VAR, "http://env-host:9000");

    let url = resolve_api_base_url(None, &toml_with_url("http://toml-host:6000")).unwrap();
    assert_eq!(url, "http://env-host:9000");

    env::remove_var(API_URL_ENV_VAR);
}

#[test]
#[serial]
fn test_blank_env_falls_through_to_toml() {
    env::set_var(API_URL_ENV_VAR, "   ");

    let url = resolve_api_base_url(Some(""), &toml_with_url("https://toml-host")).unwrap();
    assert_eq!(url, "https://toml-host");

    env::remove_var(API_URL_ENV_VAR);
}

#[test]
#[serial]
fn test_invalid_env_url_is_config_error() {
    env::set_var(API_URL_ENV_VAR, "not-a-url");

    let result = resolve_api_base_url(None, &TomlConfig::default());
    assert!(matches!(result, Err(Error::Config(_))));

    env::remove_var(API_URL_ENV_VAR);
}

#[test]
fn test_toml_config_parses_all_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_base_url = "http://radar.local:8000"
request_timeout_secs = 12

[logging]
level = "debug"
"#
    )
    .unwrap();

    let config = TomlConfig::load(file.path()).unwrap();
    assert_eq!(config.api_base_url.as_deref(), Some("http://radar.local:8000"));
    assert_eq!(config.request_timeout().as_secs(), 12);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_toml_config_empty_file_uses_defaults() {
    let file = tempfile::NamedTempFile::new().unwrap();

    let config = TomlConfig::load(file.path()).unwrap();
    assert_eq!(config, TomlConfig::default());
    assert_eq!(config.logging, LoggingConfig::default());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_config_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_base_url = [not valid").unwrap();

    let result = TomlConfig::load_or_default(Some(file.path()));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_unreadable_config_path_is_io_error() {
    // Exists, but is a directory
    let dir = tempfile::tempdir().unwrap();

    let result = TomlConfig::load_or_default(Some(dir.path()));
    assert!(matches!(result, Err(Error::Io(_))));
}
