//! CLI command implementations

pub mod get;
pub mod init;
pub mod search;
pub mod validate;

use crate::config::{load_config, ConduitConfig};
use crate::domain::{ClientError, ConduitError, TenantId};

/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for authentication failures reported by the vendor
pub const EXIT_AUTH: i32 = 3;
/// Exit code for connection failures
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for everything else
pub const EXIT_FATAL: i32 = 5;

/// Maps an error to the process exit code
pub fn exit_code_for(error: &ConduitError) -> i32 {
    match error {
        ConduitError::Configuration(_) | ConduitError::Validation(_) => EXIT_CONFIG,
        ConduitError::Client(ClientError::HttpStatus {
            status: 401 | 403, ..
        }) => EXIT_AUTH,
        ConduitError::Client(ClientError::ConnectionFailed(_) | ClientError::Timeout(_)) => {
            EXIT_CONNECTION
        }
        _ => EXIT_FATAL,
    }
}

/// Picks the tenant to query
///
/// An explicit `--tenant` must exist in the configuration. Without one, the
/// only configured tenant is used.
pub fn resolve_tenant(config: &ConduitConfig, requested: Option<&str>) -> Result<TenantId, String> {
    let id = match requested {
        Some(id) => {
            if config.tenant(id).is_none() {
                return Err(format!("tenant '{id}' is not configured"));
            }
            id.to_string()
        }
        None => match config.tenants.as_slice() {
            [only] => only.id.clone(),
            _ => {
                return Err(
                    "several tenants are configured, choose one with --tenant".to_string(),
                )
            }
        },
    };
    TenantId::new(id)
}

/// Loads the configuration, printing the failure
pub(crate) fn load_or_report(config_path: &str) -> Option<ConduitConfig> {
    match load_config(config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("❌ Failed to load configuration file: {config_path}");
            eprintln!("   Error: {e}");
            None
        }
    }
}
