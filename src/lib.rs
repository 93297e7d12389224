// Conduit - EHR vendor FHIR client
// Copyright (c) 2025 Conduit Contributors
// Licensed under the MIT License

//! # Conduit - EHR vendor FHIR client
//!
//! Conduit searches a vendor's FHIR R4 API on behalf of many tenants. Every
//! resource type goes through the same engine: page through search results,
//! batch identifier lookups, and collapse duplicates by resource id.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`client`] - [`client::EhrClient`], the entry point for library users
//! - [`resources`] - Resource types, their catalog and the shared service
//! - [`core`] - Pagination, identifier batching and de-duplication
//! - [`adapters`] - The transport trait plus HTTP and in-memory transports
//! - [`domain`] - Identifiers and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use conduit::client::EhrClient;
//! use conduit::config::load_config;
//! use conduit::core::search::SearchParameters;
//! use conduit::domain::TenantId;
//! use conduit::resources::ResourceType;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("conduit.toml")?;
//!     let client = EhrClient::from_config(&config)?;
//!     let tenant = TenantId::new("acme")?;
//!
//!     // Every page of the patient's problem list, duplicates removed
//!     let conditions = client
//!         .service(ResourceType::Condition)
//!         .search(&tenant, &SearchParameters::new().with("patient", "12724066"))
//!         .await?;
//!
//!     // Practitioners by id, ten per request
//!     let ids = vec!["4122622".to_string(), "11724002".to_string()];
//!     let practitioners = client
//!         .service(ResourceType::Practitioner)
//!         .get_by_ids(&tenant, &ids)
//!         .await?;
//!
//!     println!("{} conditions, {} practitioners", conditions.len(), practitioners.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Custom resource types
//!
//! [`resources::ResourceService`] is generic over the resource representation.
//! Pair a path with a [`core::search::ResourceCodec`] to search into your own
//! types:
//!
//! ```rust,no_run
//! use conduit::core::search::{Paginator, ResourceCodec, SearchParameters};
//! use conduit::resources::ResourceService;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Encounter {
//!     id: String,
//!     status: String,
//! }
//!
//! # async fn example(paginator: Paginator, tenant: conduit::domain::TenantId) -> conduit::domain::Result<()> {
//! let service = ResourceService::new(
//!     paginator,
//!     "Encounter",
//!     ResourceCodec::from_serde(|e: &Encounter| Some(e.id.clone())),
//! )
//! .with_batch_size(10);
//!
//! let finished = service
//!     .search(&tenant, &SearchParameters::new().with("status", "finished"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library calls return [`domain::Result`], carrying a [`domain::ConduitError`].
//! HTTP failures surface as [`domain::ClientError::HttpStatus`] with the status
//! code and response body.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod resources;
