//! Get command implementation
//!
//! Looks up resources by identifier and prints an `{id: resource}` JSON
//! object on stdout.

use super::search::render;
use super::{exit_code_for, load_or_report, resolve_tenant, EXIT_CONFIG};
use crate::client::EhrClient;
use crate::resources::ResourceType;
use crate::{log_error_with_context, log_search_complete, log_search_start};
use clap::Args;
use std::time::Instant;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Resource type (e.g. Location, Practitioner)
    pub resource: String,

    /// Resource identifiers
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Tenant to query (optional when only one is configured)
    #[arg(short, long, env = "CONDUIT_TENANT")]
    pub tenant: Option<String>,

    /// Override the batch size for this lookup
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl GetArgs {
    /// Execute the get command
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

        let client = EhrClient::from_config(&config)?;
        let mut service = client.service(resource_type);
        if let Some(batch_size) = self.batch_size {
            service = service.with_batch_size(batch_size);
        }

        log_search_start!(&tenant, resource_type);
        let started = Instant::now();

        match service.get_by_ids(&tenant, &self.ids).await {
            Ok(found) => {
                log_search_complete!(found.len(), started.elapsed());
                for id in self.ids.iter().filter(|id| !found.contains_key(*id)) {
                    tracing::warn!(id = %id, resource = %resource_type, "Identifier not found");
                }
                println!("{}", render(&found, self.pretty)?);
                Ok(0)
            }
            Err(e) => {
                log_error_with_context!(&e, "Lookup failed");
                eprintln!("❌ Lookup failed");
                eprintln!("   Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
