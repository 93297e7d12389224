//! External system integrations for Conduit.
//!
//! - [`transport`] - The [`Transport`] trait the search core talks through
//! - [`http`] - reqwest-backed transport with per-tenant auth and retry
//! - [`memory`] - Canned-response transport for tests and demos
//!
//! # Design Pattern
//!
//! The search core never builds HTTP requests itself. It calls
//! [`Transport::get`] and [`Transport::post`] with a tenant, a path and
//! parameters, which keeps the core testable against [`MemoryTransport`].
//!
//! ```rust,no_run
//! use conduit::adapters::HttpTransport;
//! use conduit::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("conduit.toml")?;
//! let transport = HttpTransport::from_config(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod memory;
pub mod transport;

pub use http::HttpTransport;
pub use memory::{MemoryTransport, RecordedRequest};
pub use transport::{RequestBody, Transport, TransportResponse};
