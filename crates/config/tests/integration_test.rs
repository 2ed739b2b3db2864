//! Integration tests for loading and binding configuration through the public API.
//!
//! These tests verify end-to-end behavior: a realistic `.env` file is loaded,
//! read through typed accessors, bound onto application structs and saved
//! back, exactly as a consuming binary would do it.

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use envreg_config::{Bind, Binder, ConfigError, DecodeError, DotEnv, Field};

const APP_ENV: &str = r#"
# Service settings
ENVREG_IT_NAME=billing-api
ENVREG_IT_DEBUG=false
ENVREG_IT_LISTEN: 0.0.0.0:8443
ENVREG_IT_TIMEOUT=1m30s
ENVREG_IT_ORIGINS=[https://a.example, https://b.example]
ENVREG_IT_UPLOAD_LIMIT=16 MB

# Database
ENVREG_IT_DB_URL="postgres://billing:p#ss@db:5432/billing" # inline comment
ENVREG_IT_DB_POOL=
ENVREG_IT_TLS_CERT='-----BEGIN CERTIFICATE-----
MIIBszCCAVmgAwIBAgIU
-----END CERTIFICATE-----'
"#;

#[derive(Debug, Default)]
struct Database {
    url: String,
    pool: u32,
}

impl Bind for Database {
    fn bind(&mut self, binder: &Binder<'_>) -> Result<(), ConfigError> {
        binder.field(&mut self.url, Field::new("ENVREG_IT_DB_URL"))?;
        binder.field(&mut self.pool, Field::new("ENVREG_IT_DB_POOL").with_default("8"))
    }
}

#[derive(Debug, Default)]
struct Service {
    name: String,
    debug: bool,
    listen: Option<std::net::SocketAddr>,
    timeout: Duration,
    origins: Vec<String>,
    tls_cert: String,
    database: Database,
}

impl Bind for Service {
    fn bind(&mut self, binder: &Binder<'_>) -> Result<(), ConfigError> {
        binder.field(&mut self.name, Field::new("ENVREG_IT_NAME"))?;
        binder.field(&mut self.debug, Field::new("ENVREG_IT_DEBUG").with_default("true"))?;

        let mut listen = std::net::SocketAddr::from(([127, 0, 0, 1], 8080));
        binder.parse(&mut listen, Field::new("ENVREG_IT_LISTEN"))?;
        self.listen = Some(listen);

        binder.field(&mut self.timeout, Field::new("ENVREG_IT_TIMEOUT"))?;
        binder.field(&mut self.origins, Field::new("ENVREG_IT_ORIGINS"))?;
        binder.field(&mut self.tls_cert, Field::new("ENVREG_IT_TLS_CERT"))?;
        binder.nested(&mut self.database)
    }
}

fn write_fixture(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join(".env");
    fs::write(&path, APP_ENV).expect("Failed to write fixture");
    path
}

#[test]
fn test_load_and_read_typed_values() {
    let temp_dir = TempDir::new().unwrap();
    let env = DotEnv::builder()
        .with_config_file(write_fixture(&temp_dir))
        .build();
    env.load().expect("fixture should load");

    assert_eq!(env.get_string("ENVREG_IT_NAME"), "billing-api");
    assert!(!env.get_bool("ENVREG_IT_DEBUG"));
    assert_eq!(env.get_duration("ENVREG_IT_TIMEOUT"), Duration::from_secs(90));
    assert_eq!(env.get_size_in_bytes("ENVREG_IT_UPLOAD_LIMIT"), 16 * 1024 * 1024);
    assert_eq!(
        env.get_string_slice("ENVREG_IT_ORIGINS"),
        vec!["https://a.example", "https://b.example"]
    );
    assert_eq!(
        env.get_string("ENVREG_IT_DB_URL"),
        "postgres://billing:p#ss@db:5432/billing"
    );
    assert!(env.is_set("ENVREG_IT_DB_POOL"));
    assert_eq!(env.get_string("ENVREG_IT_DB_POOL"), "");
}

#[test]
fn test_bind_service_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let env = DotEnv::builder()
        .with_config_file(write_fixture(&temp_dir))
        .build();
    env.load().unwrap();

    let service: Service = env.bind_new().expect("service should bind");

    assert_eq!(service.name, "billing-api");
    assert!(!service.debug);
    assert_eq!(service.listen, Some("0.0.0.0:8443".parse().unwrap()));
    assert_eq!(service.timeout, Duration::from_secs(90));
    assert_eq!(service.origins.len(), 2);
    assert_eq!(
        service.tls_cert,
        "-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIU\n-----END CERTIFICATE-----"
    );
    assert_eq!(service.database.url, "postgres://billing:p#ss@db:5432/billing");
    assert_eq!(service.database.pool, 8);
}

#[test]
fn test_prefixed_registry_reads_same_file() {
    let temp_dir = TempDir::new().unwrap();
    let env = DotEnv::builder()
        .with_config_file(write_fixture(&temp_dir))
        .with_prefix("envreg_it")
        .build();
    env.load().unwrap();

    assert_eq!(env.get_string("name"), "billing-api");
    assert_eq!(env.get_string("db_url"), env.get_string("ENVREG_IT_DB_URL"));
}

#[test]
fn test_edit_and_save_preserves_other_entries() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir);

    let env = DotEnv::builder().with_config_file(&path).build();
    env.load().unwrap();
    env.write("ENVREG_IT_DEBUG", true).unwrap();

    let reloaded = DotEnv::builder().with_config_file(&path).build();
    reloaded.load().unwrap();

    assert!(reloaded.get_bool("ENVREG_IT_DEBUG"));
    assert_eq!(reloaded.get_string("ENVREG_IT_NAME"), "billing-api");
    assert_eq!(
        reloaded.get_string("ENVREG_IT_TLS_CERT"),
        env.get_string("ENVREG_IT_TLS_CERT")
    );
    assert_eq!(
        reloaded.get_string("ENVREG_IT_DB_URL"),
        "postgres://billing:p#ss@db:5432/billing"
    );
}

#[test]
fn test_malformed_file_reports_line_without_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".env");
    fs::write(&path, "OK=1\nAPI KEY=sk-live-123\n").unwrap();

    let env = DotEnv::builder().with_config_file(&path).build();
    let err = env.load().unwrap_err();

    assert!(matches!(
        &err,
        ConfigError::Decode {
            source: DecodeError::InvalidKey { line: 2 },
            ..
        }
    ));
    assert!(!err.to_string().contains("sk-live-123"));
}

#[test]
fn test_missing_file_is_optional() {
    let temp_dir = TempDir::new().unwrap();
    let env = DotEnv::builder()
        .with_config_file(temp_dir.path().join("absent.env"))
        .build();

    assert!(!env.load_if_exists().unwrap());
    assert!(env.load().unwrap_err().is_not_found());
}
