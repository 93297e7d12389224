//! Transport trait definition
//!
//! The search core talks to the vendor API only through [`Transport`]. An
//! implementation resolves the tenant's endpoint and credentials, performs the
//! HTTP exchange and owns any retry policy. The core sees a status code and a
//! body it decodes on demand.

use crate::core::search::SearchParameters;
use crate::domain::{ClientError, Result, TenantId};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Body of a POST request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// JSON document
    Json(Value),
}

/// HTTP response as seen by the search core
///
/// The body is kept as raw bytes and only decoded when a caller asks for a
/// concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    status: u16,
    body: Vec<u8>,
}

impl TransportResponse {
    /// Creates a response from a status code and raw body
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a response with a JSON body
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as (lossy) UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Passes 2xx responses through; anything else becomes
    /// [`ClientError::HttpStatus`] carrying the status and body
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::HttpStatus {
                status: self.status,
                body: self.text(),
            }
            .into())
        }
    }

    /// Decodes the body into `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "failed to decode response body (status {}): {e}",
                self.status
            ))
            .into()
        })
    }
}

/// Authenticated access to tenant-specific vendor endpoints
///
/// `path` is either relative to the tenant's base URL (`Condition`,
/// `Location/123`) or an absolute URL, which is used verbatim. Absolute URLs
/// are how continuation links are followed.
///
/// Implementations return `Ok` for every HTTP response, whatever its status,
/// and `Err` only when no response was obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET request
    async fn get(
        &self,
        tenant: &TenantId,
        path: &str,
        params: Option<&SearchParameters>,
    ) -> Result<TransportResponse>;

    /// Issues a POST request
    async fn post(
        &self,
        tenant: &TenantId,
        path: &str,
        body: RequestBody,
        params: Option<&SearchParameters>,
    ) -> Result<TransportResponse>;
}
