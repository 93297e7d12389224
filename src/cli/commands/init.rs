//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "conduit.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Conduit configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your tenant endpoints", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set CONDUIT_TENANT_DEFAULT_USERNAME and CONDUIT_TENANT_DEFAULT_PASSWORD");
                println!("  3. Validate configuration: conduit validate-config");
                println!("  4. Run a search: conduit search Patient --param family=Smith");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Conduit Configuration File

environment = "development"

[application]
log_level = "info"

[search]
page_size = 50
method = "get"

[retry]
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[[tenants]]
id = "default"
base_url = "https://fhir.example.com/r4"
auth_type = "basic"
username = "${CONDUIT_TENANT_DEFAULT_USERNAME}"
password = "${CONDUIT_TENANT_DEFAULT_PASSWORD}"
tls_verify = true
timeout_seconds = 60

[logging]
local_enabled = false
local_path = "/var/log/conduit"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Conduit Configuration File
# EHR vendor FHIR client
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any CONDUIT_* environment variable listed below overrides the file.

# ============================================================================
# Runtime Environment
# ============================================================================
# development | staging | production
# Production forbids tls_verify = false.
environment = "development"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
# Override: CONDUIT_APPLICATION_LOG_LEVEL
log_level = "info"

# ============================================================================
# Search Settings
# ============================================================================
[search]
# Page size sent as _count when a search doesn't set one (1-1000)
# Override: CONDUIT_SEARCH_PAGE_SIZE
page_size = 50

# Stop with an error after this many pages (omit to follow every link)
# Override: CONDUIT_SEARCH_MAX_PAGES
# max_pages = 200

# How the first page is requested: "get" or "post" (POST {type}/_search)
method = "get"

# Identifiers per lookup request, per resource type.
# Types not listed use their built-in size.
[search.batch_sizes]
# Observation = 10
# Location = 25

# ============================================================================
# Retry Settings
# ============================================================================
# Connection failures, timeouts, 429 and 5xx responses are retried
[retry]
# Total attempts per request (1-10)
# Override: CONDUIT_RETRY_MAX_RETRIES
max_retries = 3

# Delay before the first retry
initial_delay_ms = 1000

# Upper bound for any single delay
max_delay_ms = 30000

# Delay multiplier between attempts
backoff_multiplier = 2.0

# ============================================================================
# Tenants
# ============================================================================
# One block per tenant. Callers select a tenant by id.
[[tenants]]
id = "default"

# FHIR R4 base URL
# Override: CONDUIT_TENANT_DEFAULT_BASE_URL
base_url = "https://fhir.example.com/r4"

# basic | bearer | none
auth_type = "basic"

# Override: CONDUIT_TENANT_DEFAULT_USERNAME / CONDUIT_TENANT_DEFAULT_PASSWORD
username = "${CONDUIT_TENANT_DEFAULT_USERNAME}"
password = "${CONDUIT_TENANT_DEFAULT_PASSWORD}"

# TLS certificate verification
tls_verify = true

# Request timeout in seconds
timeout_seconds = 60

# A bearer-token tenant
# [[tenants]]
# id = "partner"
# base_url = "https://fhir.partner.example.com/r4"
# auth_type = "bearer"
# token = "${CONDUIT_TENANT_PARTNER_TOKEN}"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Write JSON logs to files in addition to the console
# Override: CONDUIT_LOGGING_LOCAL_ENABLED
local_enabled = false

# Log directory
# Override: CONDUIT_LOGGING_LOCAL_PATH
local_path = "/var/log/conduit"

# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
