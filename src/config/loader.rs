//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ConduitConfig;
use super::secret::secret_string;
use crate::domain::errors::ConduitError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ConduitConfig
/// 4. Applies environment variable overrides (CONDUIT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use conduit::config::loader::load_config;
///
/// let config = load_config("conduit.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ConduitConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConduitError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ConduitError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Parses, overrides and validates configuration held in memory
pub fn load_config_from_str(contents: &str) -> Result<ConduitConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ConduitConfig = toml::from_str(&contents)
        .map_err(|e| ConduitError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ConduitError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ConduitError::Other(format!("invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ConduitError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Environment variable prefix for a tenant's overrides
///
/// `st-olaf.health` becomes `CONDUIT_TENANT_ST_OLAF_HEALTH_`.
pub(crate) fn tenant_env_prefix(tenant_id: &str) -> String {
    let key: String = tenant_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("CONDUIT_TENANT_{key}_")
}

/// Applies environment variable overrides using the CONDUIT_* prefix
///
/// Global settings follow `CONDUIT_<SECTION>_<KEY>` (e.g. `CONDUIT_SEARCH_PAGE_SIZE`).
/// Tenant settings follow `CONDUIT_TENANT_<ID>_<KEY>` (e.g. `CONDUIT_TENANT_ACME_PASSWORD`).
fn apply_env_overrides(config: &mut ConduitConfig) {
    if let Ok(val) = std::env::var("CONDUIT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("CONDUIT_SEARCH_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.search.page_size = size;
        }
    }
    if let Ok(val) = std::env::var("CONDUIT_SEARCH_MAX_PAGES") {
        if let Ok(pages) = val.parse() {
            config.search.max_pages = Some(pages);
        }
    }

    if let Ok(val) = std::env::var("CONDUIT_RETRY_MAX_RETRIES") {
        if let Ok(retries) = val.parse() {
            config.retry.max_retries = retries;
        }
    }

    for tenant in &mut config.tenants {
        let prefix = tenant_env_prefix(&tenant.id);
        if let Ok(val) = std::env::var(format!("{prefix}BASE_URL")) {
            tenant.base_url = val;
        }
        if let Ok(val) = std::env::var(format!("{prefix}USERNAME")) {
            tenant.username = Some(val);
        }
        if let Ok(val) = std::env::var(format!("{prefix}PASSWORD")) {
            tenant.password = Some(secret_string(val));
        }
        if let Ok(val) = std::env::var(format!("{prefix}TOKEN")) {
            tenant.token = Some(secret_string(val));
        }
    }

    if let Ok(val) = std::env::var("CONDUIT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CONDUIT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
