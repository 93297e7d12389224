//! Configuration management for Conduit.
//!
//! Conduit reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CONDUIT_*` environment overrides, including per-tenant credentials
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use conduit::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("conduit.toml")?;
//!
//! println!("Default page size: {}", config.search.page_size);
//! for tenant in &config.tenants {
//!     println!("{} -> {}", tenant.id, tenant.base_url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [search]
//! page_size = 50
//! method = "get"
//!
//! [search.batch_sizes]
//! Observation = 10
//!
//! [retry]
//! max_retries = 3
//!
//! [[tenants]]
//! id = "acme"
//! base_url = "https://fhir.acme-health.example/r4"
//! auth_type = "basic"
//! username = "integration"
//! password = "${ACME_FHIR_PASSWORD}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, ConduitConfig, Environment, LoggingConfig, RetryConfig, SearchConfig,
    TenantConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
