//! HTTP transport for vendor FHIR endpoints
//!
//! Resolves each tenant's base URL and credentials, sends requests with
//! reqwest and retries transient failures with exponential backoff.

use super::transport::{RequestBody, Transport, TransportResponse};
use crate::config::{ConduitConfig, RetryConfig, SecretString, TenantConfig};
use crate::core::search::SearchParameters;
use crate::domain::{ClientError, ConduitError, Result, TenantId};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const FHIR_JSON: &str = "application/fhir+json";

/// Credentials attached to every request for a tenant
enum TenantAuth {
    None,
    Basic {
        username: String,
        password: SecretString,
    },
    Bearer(SecretString),
}

impl TenantAuth {
    fn from_config(config: &TenantConfig) -> Result<Self> {
        match config.auth_type.as_str() {
            "none" => Ok(TenantAuth::None),
            "basic" => match (&config.username, &config.password) {
                (Some(username), Some(password)) => Ok(TenantAuth::Basic {
                    username: username.clone(),
                    password: password.clone(),
                }),
                _ => Err(ConduitError::Configuration(format!(
                    "tenant '{}': basic auth requires username and password",
                    config.id
                ))),
            },
            "bearer" => config
                .token
                .clone()
                .map(TenantAuth::Bearer)
                .ok_or_else(|| {
                    ConduitError::Configuration(format!(
                        "tenant '{}': bearer auth requires a token",
                        config.id
                    ))
                }),
            other => Err(ConduitError::Configuration(format!(
                "tenant '{}': unsupported auth_type '{other}'",
                config.id
            ))),
        }
    }

    /// Build authorization header value
    fn header_value(&self) -> Option<String> {
        match self {
            TenantAuth::None => None,
            TenantAuth::Basic { username, password } => {
                let credentials = format!("{username}:{}", password.expose_secret().as_ref());
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Some(format!("Basic {encoded}"))
            }
            TenantAuth::Bearer(token) => Some(format!("Bearer {}", token.expose_secret().as_ref())),
        }
    }
}

/// One tenant's endpoint
struct TenantEndpoint {
    base_url: String,
    client: Client,
    auth: TenantAuth,
}

impl TenantEndpoint {
    fn new(config: &TenantConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            ConduitError::Configuration(format!(
                "tenant '{}': failed to build HTTP client: {e}",
                config.id
            ))
        })?;

        Url::parse(&config.base_url).map_err(|e| {
            ConduitError::Configuration(format!(
                "tenant '{}': invalid base_url '{}': {e}",
                config.id, config.base_url
            ))
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            auth: TenantAuth::from_config(config)?,
        })
    }

    /// Resolves `path` against the base URL; absolute URLs pass through verbatim
    fn resolve(&self, path: &str, params: Option<&SearchParameters>) -> Result<Url> {
        let raw = if is_absolute(path) {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };

        let mut url =
            Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))?;

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            let mut query = url.query_pairs_mut();
            for (name, value) in params.to_query_pairs() {
                query.append_pair(&name, &value);
            }
        }

        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, FHIR_JSON);
        match self.auth.header_value() {
            Some(auth) => request.header(reqwest::header::AUTHORIZATION, auth),
            None => request,
        }
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// reqwest-backed [`Transport`]
///
/// # Example
///
/// ```no_run
/// use conduit::adapters::HttpTransport;
/// use conduit::config::load_config;
///
/// # fn example() -> conduit::domain::Result<()> {
/// let config = load_config("conduit.toml")?;
/// let transport = HttpTransport::from_config(&config)?;
/// # Ok(())
/// # }
/// ```
pub struct HttpTransport {
    endpoints: HashMap<TenantId, TenantEndpoint>,
    retry: RetryConfig,
}

impl HttpTransport {
    /// Builds a transport for the given tenants
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a tenant id or base URL is invalid,
    /// or its credentials don't match its auth type.
    pub fn new(tenants: &[TenantConfig], retry: RetryConfig) -> Result<Self> {
        let mut endpoints = HashMap::with_capacity(tenants.len());
        for tenant in tenants {
            let id = TenantId::new(tenant.id.clone()).map_err(ConduitError::Configuration)?;
            endpoints.insert(id, TenantEndpoint::new(tenant)?);
        }
        Ok(Self { endpoints, retry })
    }

    /// Builds a transport from the tenant and retry sections of the configuration
    pub fn from_config(config: &ConduitConfig) -> Result<Self> {
        Self::new(&config.tenants, config.retry.clone())
    }

    /// Base URL configured for a tenant
    pub fn base_url(&self, tenant: &TenantId) -> Option<&str> {
        self.endpoints.get(tenant).map(|e| e.base_url.as_str())
    }

    fn endpoint(&self, tenant: &TenantId) -> Result<&TenantEndpoint> {
        self.endpoints
            .get(tenant)
            .ok_or_else(|| ClientError::UnknownTenant(tenant.to_string()).into())
    }

    fn backoff_delay(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay_ms = (self.retry.initial_delay_ms as f64
            * self.retry.backoff_multiplier.powi(exponent)) as u64;
        Duration::from_millis(delay_ms.min(self.retry.max_delay_ms))
    }

    /// Sends a request, retrying connection failures, timeouts, 429 and 5xx
    async fn execute<F>(&self, tenant: &TenantId, url: &Url, build: F) -> Result<TransportResponse>
    where
        F: Fn() -> RequestBuilder,
    {
        let max_retries = self.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let outcome = send_once(build()).await;

            let retry_reason = match &outcome {
                Ok(response) if is_retryable_status(response.status()) => {
                    Some(format!("status {}", response.status()))
                }
                Err(ConduitError::Client(e)) if e.is_retryable() => Some(e.to_string()),
                _ => None,
            };

            match retry_reason {
                Some(reason) if attempt < max_retries => {
                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        tenant = %tenant,
                        url = %url,
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay.as_millis() as u64,
                        reason = %reason,
                        "Retrying request after error"
                    );
                    tokio::time::sleep(delay).await;
                }
                _ => return outcome,
            }
        }
    }
}

fn is_retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

async fn send_once(request: RequestBuilder) -> Result<TransportResponse> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    Ok(TransportResponse::new(status, body.to_vec()))
}

fn map_reqwest_error(e: reqwest::Error) -> ConduitError {
    if e.is_timeout() {
        ClientError::Timeout(e.to_string()).into()
    } else {
        ClientError::ConnectionFailed(e.to_string()).into()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        tenant: &TenantId,
        path: &str,
        params: Option<&SearchParameters>,
    ) -> Result<TransportResponse> {
        let endpoint = self.endpoint(tenant)?;
        let url = endpoint.resolve(path, params)?;

        tracing::debug!(tenant = %tenant, url = %url, "GET");

        let response = self
            .execute(tenant, &url, || {
                endpoint.authorize(endpoint.client.get(url.clone()))
            })
            .await?;

        tracing::debug!(tenant = %tenant, url = %url, status = response.status(), "GET completed");
        Ok(response)
    }

    async fn post(
        &self,
        tenant: &TenantId,
        path: &str,
        body: RequestBody,
        params: Option<&SearchParameters>,
    ) -> Result<TransportResponse> {
        let endpoint = self.endpoint(tenant)?;
        let url = endpoint.resolve(path, params)?;

        tracing::debug!(tenant = %tenant, url = %url, "POST");

        let response = self
            .execute(tenant, &url, || {
                let request = endpoint.authorize(endpoint.client.post(url.clone()));
                match &body {
                    RequestBody::Form(pairs) => request.form(pairs),
                    RequestBody::Json(value) => request
                        .header(reqwest::header::CONTENT_TYPE, FHIR_JSON)
                        .body(value.to_string()),
                }
            })
            .await?;

        tracing::debug!(tenant = %tenant, url = %url, status = response.status(), "POST completed");
        Ok(response)
    }
}
