//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Conduit using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Conduit - EHR vendor FHIR client
#[derive(Parser, Debug)]
#[command(name = "conduit")]
#[command(version, about, long_about = None)]
#[command(author = "Conduit Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "conduit.toml", env = "CONDUIT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CONDUIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a resource type and print every matching resource
    Search(commands::search::SearchArgs),

    /// Look up resources by identifier
    Get(commands::get::GetArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_search() {
        let cli = Cli::parse_from([
            "conduit",
            "search",
            "Condition",
            "--tenant",
            "acme",
            "--param",
            "patient=12724066",
            "--param",
            "clinical-status=active",
        ]);
        assert_eq!(cli.config, "conduit.toml");
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.resource, "Condition");
                assert_eq!(args.tenant.as_deref(), Some("acme"));
                assert_eq!(args.params.len(), 2);
            }
            other => panic!("Expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_get() {
        let cli = Cli::parse_from(["conduit", "get", "Location", "L1", "L2"]);
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.resource, "Location");
                assert_eq!(args.ids, vec!["L1", "L2"]);
            }
            other => panic!("Expected get, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_get_requires_ids() {
        assert!(Cli::try_parse_from(["conduit", "get", "Location"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["conduit", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["conduit", "--log-level", "debug", "init"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
