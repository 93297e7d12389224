//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human-readable console output
//! - Optional JSON file output with rotation
//! - `RUST_LOG` overrides through `EnvFilter`
//!
//! # Example
//!
//! ```no_run
//! use conduit::logging::init_logging;
//! use conduit::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a search
///
/// # Example
///
/// ```no_run
/// use conduit::log_search_start;
/// use conduit::domain::TenantId;
///
/// let tenant = TenantId::new("acme").unwrap();
/// log_search_start!(&tenant, "Condition");
/// ```
#[macro_export]
macro_rules! log_search_start {
    ($tenant:expr, $resource:expr) => {
        tracing::info!(
            tenant = %$tenant,
            resource = %$resource,
            "Starting search"
        );
    };
}

/// Log the completion of a search or lookup
///
/// # Example
///
/// ```no_run
/// use conduit::log_search_complete;
/// use std::time::Duration;
///
/// log_search_complete!(42, Duration::from_millis(350));
/// ```
#[macro_export]
macro_rules! log_search_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Search completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use conduit::log_error_with_context;
/// use conduit::domain::ConduitError;
///
/// let error = ConduitError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
