//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` so they don't
//! interfere with each other.

use conduit::config::{load_config, Environment};
use conduit::core::search::SearchMethod;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("CONDUIT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("CONDUIT_SEARCH_PAGE_SIZE");
    std::env::remove_var("CONDUIT_SEARCH_MAX_PAGES");
    std::env::remove_var("CONDUIT_TENANT_ACME_PASSWORD");
    std::env::remove_var("CONDUIT_TENANT_ACME_BASE_URL");
    std::env::remove_var("TEST_ACME_PASSWORD");
    std::env::remove_var("TEST_GLOBEX_TOKEN");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
environment = "staging"

[application]
log_level = "debug"

[search]
page_size = 100
max_pages = 500
method = "post"

[search.batch_sizes]
Observation = 10
Location = 25

[retry]
max_retries = 5
initial_delay_ms = 250
max_delay_ms = 5000
backoff_multiplier = 3.0

[[tenants]]
id = "acme"
base_url = "https://fhir.acme.example.com/r4"
auth_type = "basic"
username = "svc-conduit"
password = "hunter2"
timeout_seconds = 30

[[tenants]]
id = "globex"
base_url = "https://fhir.globex.example.com/r4"
auth_type = "bearer"
token = "abc.def.ghi"

[logging]
local_enabled = true
local_path = "/tmp/conduit-logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.search.page_size, 100);
    assert_eq!(config.search.max_pages, Some(500));
    assert_eq!(config.search.method, SearchMethod::Post);
    assert_eq!(config.search.batch_size_for("Location"), Some(25));
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.tenants.len(), 2);

    let acme = config.tenant("acme").unwrap();
    assert_eq!(acme.timeout_seconds, 30);
    assert_eq!(
        acme.password.as_ref().unwrap().expose_secret().as_ref(),
        "hunter2"
    );

    let globex = config.tenant("globex").unwrap();
    assert_eq!(globex.auth_type, "bearer");
    assert!(globex.tls_verify);

    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[[tenants]]
id = "acme"
base_url = "https://fhir.acme.example.com/r4"
auth_type = "none"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.search.page_size, 50);
    assert_eq!(config.search.max_pages, None);
    assert_eq!(config.search.method, SearchMethod::Get);
    assert!(config.search.batch_sizes.is_empty());
    assert_eq!(config.retry.max_retries, 3);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("TEST_ACME_PASSWORD", "from-env");
    std::env::set_var("TEST_GLOBEX_TOKEN", "token-from-env");

    let file = write_config(
        r#"
[[tenants]]
id = "acme"
base_url = "https://fhir.acme.example.com/r4"
username = "svc"
password = "${TEST_ACME_PASSWORD}"

[[tenants]]
id = "globex"
base_url = "https://fhir.globex.example.com/r4"
auth_type = "bearer"
token = "${TEST_GLOBEX_TOKEN}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    cleanup_env_vars();

    assert_eq!(
        config.tenant("acme").unwrap().password.as_ref().unwrap().expose_secret().as_ref(),
        "from-env"
    );
    assert_eq!(
        config.tenant("globex").unwrap().token.as_ref().unwrap().expose_secret().as_ref(),
        "token-from-env"
    );
}

#[test]
fn test_missing_env_var_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[[tenants]]
id = "acme"
base_url = "https://fhir.acme.example.com/r4"
username = "svc"
password = "${TEST_ACME_PASSWORD}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_ACME_PASSWORD"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("CONDUIT_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("CONDUIT_SEARCH_PAGE_SIZE", "200");
    std::env::set_var("CONDUIT_SEARCH_MAX_PAGES", "10");
    std::env::set_var("CONDUIT_TENANT_ACME_PASSWORD", "overridden");
    std::env::set_var("CONDUIT_TENANT_ACME_BASE_URL", "https://staging.acme.example.com/r4");

    let file = write_config(
        r#"
[application]
log_level = "info"

[[tenants]]
id = "acme"
base_url = "https://fhir.acme.example.com/r4"
username = "svc"
password = "original"
"#,
    );

    let config = load_config(file.path()).unwrap();
    cleanup_env_vars();

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.search.page_size, 200);
    assert_eq!(config.search.max_pages, Some(10));

    let acme = config.tenant("acme").unwrap();
    assert_eq!(acme.base_url, "https://staging.acme.example.com/r4");
    assert_eq!(
        acme.password.as_ref().unwrap().expose_secret().as_ref(),
        "overridden"
    );
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        // no tenants
        "[application]\nlog_level = \"info\"\n",
        // page size out of range
        "[search]\npage_size = 0\n\n[[tenants]]\nid = \"a\"\nbase_url = \"https://x.example.com\"\nauth_type = \"none\"\n",
        // unknown resource type in batch overrides
        "[search.batch_sizes]\nWidget = 5\n\n[[tenants]]\nid = \"a\"\nbase_url = \"https://x.example.com\"\nauth_type = \"none\"\n",
        // basic auth without password
        "[[tenants]]\nid = \"a\"\nbase_url = \"https://x.example.com\"\nusername = \"u\"\n",
        // duplicate tenant ids
        "[[tenants]]\nid = \"a\"\nbase_url = \"https://x.example.com\"\nauth_type = \"none\"\n\n[[tenants]]\nid = \"a\"\nbase_url = \"https://y.example.com\"\nauth_type = \"none\"\n",
        // tls verification off in production
        "environment = \"production\"\n\n[[tenants]]\nid = \"a\"\nbase_url = \"https://x.example.com\"\nauth_type = \"none\"\ntls_verify = false\n",
    ];

    for contents in cases {
        let file = write_config(contents);
        assert!(
            load_config(file.path()).is_err(),
            "expected validation failure for:\n{contents}"
        );
    }
}

#[test]
fn test_missing_file() {
    let err = load_config("/nonexistent/conduit.toml").unwrap_err();
    assert!(err.to_string().contains("not found"));
}
