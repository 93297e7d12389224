//! Validate config command implementation
//!
//! Loads the configuration file (which validates it) and prints a summary.

use super::{load_or_report, EXIT_CONFIG};
use crate::config::ConduitConfig;
use crate::resources::catalog;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let Some(config) = load_or_report(config_path) else {
            return Ok(EXIT_CONFIG);
        };

        println!("✅ Configuration is valid");
        println!();
        print!("{}", summary(&config));
        println!();
        Ok(0)
    }
}

fn summary(config: &ConduitConfig) -> String {
    let mut out = String::from("Configuration Summary:\n");
    out.push_str(&format!("  Environment: {:?}\n", config.environment));
    out.push_str(&format!("  Log Level: {}\n", config.application.log_level));
    out.push_str(&format!("  Page Size: {}\n", config.search.page_size));
    out.push_str(&format!(
        "  Max Pages: {}\n",
        config
            .search
            .max_pages
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string())
    ));
    out.push_str(&format!("  Search Method: {}\n", config.search.method));
    out.push_str(&format!("  Max Retries: {}\n", config.retry.max_retries));

    out.push_str("  Tenants:\n");
    for tenant in &config.tenants {
        out.push_str(&format!(
            "    - {} ({}, auth: {})\n",
            tenant.id, tenant.base_url, tenant.auth_type
        ));
    }

    if !config.search.batch_sizes.is_empty() {
        out.push_str("  Batch Size Overrides:\n");
        for (name, size) in &config.search.batch_sizes {
            let default = catalog::find(name).map(|s| s.batch_size).unwrap_or(1);
            out.push_str(&format!("    - {name}: {size} (default {default})\n"));
        }
    }

    out
}
