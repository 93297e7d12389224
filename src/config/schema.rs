//! Configuration schema types
//!
//! This module defines the configuration structure for Conduit.

use crate::config::SecretString;
use crate::core::search::SearchMethod;
use crate::resources::catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main Conduit configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConduitConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Search and batch lookup settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Transport retry settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Vendor endpoints, one per tenant
    #[serde(default)]
    pub tenants: Vec<TenantConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConduitConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.search.validate()?;
        self.retry.validate()?;

        if self.tenants.is_empty() {
            return Err("at least one [[tenants]] entry is required".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for tenant in &self.tenants {
            tenant.validate(&self.environment)?;
            if !seen.insert(tenant.id.as_str()) {
                return Err(format!("duplicate tenant id '{}'", tenant.id));
            }
        }

        self.logging.validate()?;
        Ok(())
    }

    /// Looks up a tenant's configuration by id
    pub fn tenant(&self, id: &str) -> Option<&TenantConfig> {
        self.tenants.iter().find(|t| t.id == id)
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Search configuration shared by every resource service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size injected as `_count` when the caller does not supply one
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Abort a search after this many pages (unset = follow every link)
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// How the first page of a search is requested
    #[serde(default)]
    pub method: SearchMethod,

    /// Per-resource batch size overrides, keyed by resource type
    /// (e.g. `Observation = 10`)
    #[serde(default)]
    pub batch_sizes: BTreeMap<String, usize>,
}

impl SearchConfig {
    fn validate(&self) -> Result<(), String> {
        if !(1..=1000).contains(&self.page_size) {
            return Err(format!(
                "search.page_size must be between 1 and 1000, got {}",
                self.page_size
            ));
        }

        if self.max_pages == Some(0) {
            return Err("search.max_pages must be > 0 when set".to_string());
        }

        for (resource_type, batch_size) in &self.batch_sizes {
            if catalog::find(resource_type).is_none() {
                return Err(format!(
                    "search.batch_sizes references unknown resource type '{resource_type}'"
                ));
            }
            if *batch_size == 0 {
                return Err(format!(
                    "search.batch_sizes.{resource_type} must be >= 1, got 0"
                ));
            }
        }

        Ok(())
    }

    /// Batch size override for a resource type, if configured
    pub fn batch_size_for(&self, resource_type: &str) -> Option<usize> {
        self.batch_sizes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(resource_type))
            .map(|(_, size)| *size)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: None,
            method: SearchMethod::default(),
            batch_sizes: BTreeMap::new(),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(format!(
                "retry.max_retries must be between 1 and 10, got {}",
                self.max_retries
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Endpoint and credentials for one tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Tenant identifier passed by callers
    pub id: String,

    /// FHIR base URL of the tenant's vendor endpoint
    pub base_url: String,

    /// Authentication type (basic, bearer, none)
    #[serde(default = "default_auth_type")]
    pub auth_type: String,

    /// Username for basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Access token for bearer authentication
    #[serde(default)]
    pub token: Option<SecretString>,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: must stay `true` in production (enforced by validation).
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl TenantConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.id.trim().is_empty() {
            return Err("tenants.id cannot be empty".to_string());
        }

        if self.base_url.is_empty() {
            return Err(format!("tenant '{}': base_url cannot be empty", self.id));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "tenant '{}': base_url must start with http:// or https://",
                self.id
            ));
        }

        match self.auth_type.as_str() {
            "basic" => {
                if self.username.as_ref().map(|s| s.is_empty()).unwrap_or(true) {
                    return Err(format!(
                        "tenant '{}': username cannot be empty when auth_type is 'basic'",
                        self.id
                    ));
                }
                if self
                    .password
                    .as_ref()
                    .map(|s| s.expose_secret().is_empty())
                    .unwrap_or(true)
                {
                    return Err(format!(
                        "tenant '{}': password cannot be empty when auth_type is 'basic'",
                        self.id
                    ));
                }
            }
            "bearer" => {
                if self
                    .token
                    .as_ref()
                    .map(|s| s.expose_secret().is_empty())
                    .unwrap_or(true)
                {
                    return Err(format!(
                        "tenant '{}': token cannot be empty when auth_type is 'bearer'",
                        self.id
                    ));
                }
            }
            "none" => {}
            other => {
                return Err(format!(
                    "tenant '{}': invalid auth_type '{}'. Must be one of: basic, bearer, none",
                    self.id, other
                ));
            }
        }

        if self.timeout_seconds == 0 {
            return Err(format!("tenant '{}': timeout_seconds must be > 0", self.id));
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(format!(
                "tenant '{}': TLS certificate verification cannot be disabled in production environments",
                self.id
            ));
        }

        Ok(())
    }
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            base_url: "http://localhost:8080/fhir/r4".to_string(),
            auth_type: "none".to_string(),
            username: None,
            password: None,
            token: None,
            tls_verify: true,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> usize {
    50
}

fn default_auth_type() -> String {
    "basic".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_local_path() -> String {
    "/var/log/conduit".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
