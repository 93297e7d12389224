//! Resource-type services
//!
//! - [`resource`] - [`ResourceType`] and the JSON-backed [`Resource`]
//! - [`catalog`] - Per-type path, default parameters and batch size
//! - [`service`] - [`ResourceService`], the engine every type shares

pub mod catalog;
pub mod resource;
pub mod service;

pub use catalog::ResourceSpec;
pub use resource::{Resource, ResourceType};
pub use service::ResourceService;
