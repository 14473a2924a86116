mod common;

use common::temp_config;
use reusable_state::config::{AuthType, Config, ConfigError, ConfigStore};

/// Test that Config::default() points at the public API.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.api.base_url, "https://api.freeapi.app/api/v1");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.api.connect_timeout_seconds, 5);

    assert_eq!(config.session.auth_type(), AuthType::Bearer);
    assert!(config.session.credentials_path().is_none());

    assert_eq!(config.resources.cats, "/public/cats");
    assert_eq!(config.resources.dogs, "/public/dogs");
    assert_eq!(config.resources.todos, "/todos");

    assert!(config.validate().is_ok());
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("reusable-state/config.toml"));
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let (_dir, path) = temp_config(
        r#"
[api]
base_url = "http://localhost:8080/api/v1"

[resources]
todos = "/v2/todos"
"#,
    );

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.api.base_url, "http://localhost:8080/api/v1");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.resources.todos, "/v2/todos");
    assert_eq!(config.resources.cats, "/public/cats");
}

#[test]
fn test_session_section() {
    let (_dir, path) = temp_config(
        r#"
[session]
auth_type = "none"
credentials_path = "/tmp/creds.toml"
"#,
    );

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.session.auth_type(), AuthType::None);
    assert_eq!(
        config.session.credentials_path().unwrap().to_str(),
        Some("/tmp/creds.toml")
    );
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let (_dir, path) = temp_config("[api\nbase_url = ");
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_validation_rejects_non_http_base_url() {
    let (_dir, path) = temp_config("[api]\nbase_url = \"ftp://example.com\"\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("api.base_url"));
}

#[test]
fn test_validation_rejects_zero_timeout() {
    let mut config = Config::default();
    config.api.timeout_seconds = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_rejects_relative_endpoint() {
    let mut config = Config::default();
    config.resources.dogs = "public/dogs".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("resources.dogs"));
}

#[test]
fn test_config_store_reload() {
    let (_dir, path) = temp_config("[api]\nbase_url = \"http://one.test\"\n");
    let store = ConfigStore::new(Config::load_from(&path).unwrap(), path.clone());
    assert_eq!(store.get().api.base_url, "http://one.test");

    assert!(!store.reload().unwrap());

    std::fs::write(&path, "[api]\nbase_url = \"http://two.test\"\n").unwrap();
    assert!(store.reload().unwrap());
    assert_eq!(store.get().api.base_url, "http://two.test");

    // A broken file keeps the last good config.
    std::fs::write(&path, "[api]\nbase_url = \"nope\"\n").unwrap();
    assert!(store.reload().is_err());
    assert_eq!(store.get().api.base_url, "http://two.test");
    assert_eq!(store.path(), path.as_path());
}
