//! Search command implementation
//!
//! Runs one search against a tenant and prints the de-duplicated resources
//! as a JSON array on stdout.

use super::{exit_code_for, load_or_report, resolve_tenant, EXIT_CONFIG};
use crate::client::EhrClient;
use crate::core::search::SearchParameters;
use crate::resources::ResourceType;
use crate::{log_error_with_context, log_search_complete, log_search_start};
use clap::Args;
use std::time::Instant;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Resource type to search (e.g. Condition, Observation)
    pub resource: String,

    /// Tenant to query (optional when only one is configured)
    #[arg(short, long, env = "CONDUIT_TENANT")]
    pub tenant: Option<String>,

    /// Search parameter as name=value; repeat for more
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl SearchArgs {
    /// Execute the search command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let Some(config) = load_or_report(config_path) else {
            return Ok(EXIT_CONFIG);
        };

        let resource_type: ResourceType = match self.resource.parse() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let tenant = match resolve_tenant(&config, self.tenant.as_deref()) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let filters = match SearchParameters::from_pairs(&self.params) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("❌ Invalid --param: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let client = EhrClient::from_config(&config)?;

        log_search_start!(&tenant, resource_type);
        let started = Instant::now();

        match client.service(resource_type).search(&tenant, &filters).await {
            Ok(resources) => {
                log_search_complete!(resources.len(), started.elapsed());
                println!("{}", render(&resources, self.pretty)?);
                Ok(0)
            }
            Err(e) => {
                log_error_with_context!(&e, "Search failed");
                eprintln!("❌ Search failed");
                eprintln!("   Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

pub(crate) fn render<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
