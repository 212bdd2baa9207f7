//! Integration tests for configuration loading.
//!
//! These tests write configuration files to a temporary directory and load
//! them through the public API.

use std::collections::HashMap;
use std::io::Write;

use pqdsn::prelude::*;
use pretty_assertions::assert_eq;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

fn no_vars() -> HashMap<String, String> {
    HashMap::new()
}

/// Test loading a minimal configuration file
#[test]
fn test_config_file_minimal() {
    let file = write_config(
        r#"
        [parameters]
        dbname = "app"
        "#,
    );

    let config = DsnConfig::from_file(file.path()).expect("Failed to load config");
    assert_eq!(config.parameters().to_dsn_string(), "dbname=app");
}

/// Test loading a configuration with an environment overlay
#[test]
fn test_config_file_with_environments() {
    let file = write_config(
        r#"
        [parameters]
        dbname = "pqgotest"
        user = "pqgotest"
        host = "localhost"
        port = 5432
        fallback_application_name = "pqdsn test"

        [environments.production]
        password = "it's secret"
        host = "db.example.com"
        port = 1234
        sslmode = "verify-full"
        "#,
    );

    let config = DsnConfig::from_file(file.path()).expect("Failed to load config");
    let prod = config
        .for_environment("production")
        .expect("production should exist");

    assert_eq!(
        prod.to_escaped_string(),
        r"dbname=pqgotest user=pqgotest password='it\'s secret' host=db.example.com port=1234 sslmode=verify-full fallback_application_name='pqdsn test'"
    );

    // The base is not modified by applying an overlay.
    assert_eq!(config.parameters().host, "localhost");
    assert_eq!(config.parameters().sslmode, None);
}

/// Test a missing configuration file
#[test]
fn test_config_file_missing() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("missing.toml");

    let err = DsnConfig::from_file(&path).unwrap_err();
    match err {
        DsnError::Io { path: reported, .. } => assert!(reported.ends_with("missing.toml")),
        other => panic!("expected Io error, got {other:?}"),
    }
}

/// Test a configuration with invalid TOML
#[test]
fn test_config_file_invalid_toml() {
    let file = write_config("[parameters\ndbname = \"app\"\n");
    assert!(matches!(
        DsnConfig::from_file(file.path()),
        Err(DsnError::Toml { .. })
    ));
}

/// Test a port that does not fit the field's type
#[test]
fn test_config_port_out_of_range() {
    let result = DsnConfig::from_str_with_env("[parameters]\nport = 70000\n", &no_vars());
    assert!(matches!(result, Err(DsnError::Toml { .. })));
}

/// Test interpolation of secrets from the environment
#[test]
fn test_config_env_interpolation() {
    let source = HashMap::from([("DB_PASSWORD", "hunter 2"), ("DB_NAME", "orders")]);

    let config = DsnConfig::from_str_with_env(
        r#"
        [parameters]
        dbname = "${DB_NAME}"
        password = "${DB_PASSWORD}"
        host = "${DB_HOST:-127.0.0.1}"
        "#,
        &source,
    )
    .expect("Failed to parse config");

    assert_eq!(
        config.parameters().to_escaped_string(),
        "dbname=orders password='hunter 2' host=127.0.0.1"
    );
}

/// Test that every defined environment can be resolved
#[test]
fn test_config_all_environments_resolve() {
    let config = DsnConfig::from_str_with_env(
        r#"
        [parameters]
        dbname = "app"

        [environments.dev]
        host = "localhost"

        [environments.ci]
        host = "postgres"
        connect_timeout = 5
        "#,
        &no_vars(),
    )
    .expect("Failed to parse config");

    let dsns: Vec<String> = config
        .environment_names()
        .map(|env| config.for_environment(env).unwrap().to_dsn_string())
        .collect();

    assert_eq!(
        dsns,
        [
            "dbname=app host=postgres connect_timeout=5",
            "dbname=app host=localhost",
        ]
    );
}

/// Test reading the libpq environment variables
#[test]
fn test_parameters_from_pg_env() {
    let source = HashMap::from([
        ("PGDATABASE", "app"),
        ("PGUSER", "svc"),
        ("PGPASSWORD", "p w"),
        ("PGCONNECT_TIMEOUT", "15"),
        ("PGSSLROOTCERT", "/etc/ssl/root.crt"),
    ]);

    let p = Parameters::from_env_source(&source).expect("valid environment");
    assert_eq!(
        p.to_escaped_string(),
        "dbname=app user=svc password='p w' connect_timeout=15 sslrootcert=/etc/ssl/root.crt"
    );
}

/// Test layering configuration under environment variables with merge
#[test]
fn test_env_overrides_config() {
    let config = DsnConfig::from_str_with_env(
        "[parameters]\ndbname = \"app\"\nhost = \"localhost\"\n",
        &no_vars(),
    )
    .expect("Failed to parse config");
    let env = Parameters::from_env_source(&HashMap::from([("PGHOST", "db")]))
        .expect("valid environment");

    let p = merge(config.parameters().clone(), &env);
    assert_eq!(p.to_dsn_string(), "dbname=app host=db");
}

/// Test that secrets with TOML-significant characters survive interpolation
#[test]
fn test_config_env_values_are_not_reparsed() {
    let source = HashMap::from([
        ("DB_PASSWORD", r#"it's a "quoted" \ secret"#),
        ("DB_CERT", r"C:\certs\new\client.pem"),
    ]);

    let config = DsnConfig::from_str_with_env(
        r#"
        # Rotate with ${DB_ADMIN_PASSWORD} from the vault.
        [parameters]
        dbname = 'cost$center'
        password = "${DB_PASSWORD}"
        sslcert = "${DB_CERT}"
        "#,
        &source,
    )
    .expect("Failed to parse config");

    assert_eq!(
        config.parameters().to_escaped_string(),
        r#"dbname=cost$center password='it\'s a "quoted" \ secret' sslcert=C:\certs\new\client.pem"#
    );
}
