//! Domain types for Conduit.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TenantId`], [`ResourceId`])
//! - **Error types** ([`ConduitError`], [`ClientError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ConduitError>`]. Failures talking
//! to the vendor API surface as [`ClientError`], which carries the HTTP status
//! and body for non-success responses:
//!
//! ```rust
//! use conduit::domain::{ClientError, ConduitError};
//!
//! let err: ConduitError = ClientError::HttpStatus {
//!     status: 401,
//!     body: "session expired".to_string(),
//! }
//! .into();
//! assert_eq!(err.status(), Some(401));
//! ```

pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ClientError, ConduitError};
pub use ids::{ResourceId, TenantId};
pub use result::Result;
