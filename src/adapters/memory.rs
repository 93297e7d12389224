//! In-memory transport
//!
//! A [`Transport`] that serves canned responses and records every request it
//! receives. Used to exercise services without a vendor endpoint.

use super::transport::{RequestBody, Transport, TransportResponse};
use crate::core::search::SearchParameters;
use crate::domain::{ClientError, Result, TenantId};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A request captured by [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// `GET` or `POST`
    pub method: &'static str,
    /// Tenant the request was issued for
    pub tenant: TenantId,
    /// Relative path or absolute URL, as passed by the caller
    pub path: String,
    /// Query parameters, if any were passed
    pub params: Option<SearchParameters>,
    /// POST body
    pub body: Option<RequestBody>,
}

impl RecordedRequest {
    /// Scalar query parameter value, if present
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.as_ref().and_then(|p| p.get_single(name))
    }

    /// Form field value of a POST body, if present
    pub fn form_field(&self, name: &str) -> Option<&str> {
        match &self.body {
            Some(RequestBody::Form(pairs)) => pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Response(TransportResponse),
    ConnectionError(String),
}

type Handler = dyn Fn(&RecordedRequest) -> Option<TransportResponse> + Send + Sync;

/// Canned-response transport
///
/// Responses registered for a path are served in order; the last one is
/// repeated once the others are used up. Requests that match no route go to
/// the handler, if one is set, and otherwise get a 404.
///
/// # Example
///
/// ```
/// use conduit::adapters::{MemoryTransport, Transport, TransportResponse};
/// use conduit::domain::TenantId;
/// use serde_json::json;
///
/// # async fn example() -> conduit::domain::Result<()> {
/// let transport = MemoryTransport::new()
///     .route("Location/1", TransportResponse::json(200, &json!({"id": "1"})));
///
/// let tenant = TenantId::new("acme").unwrap();
/// let response = transport.get(&tenant, "Location/1", None).await?;
/// assert_eq!(response.status(), 200);
/// assert_eq!(transport.requests().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MemoryTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    handler: Option<Box<Handler>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MemoryTransport {
    /// Creates a transport with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a response for `path`
    pub fn route(self, path: impl Into<String>, response: TransportResponse) -> Self {
        self.push(path.into(), Reply::Response(response));
        self
    }

    /// Makes requests to `path` fail as if the connection dropped
    pub fn route_error(self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(path.into(), Reply::ConnectionError(message.into()));
        self
    }

    /// Sets the fallback for requests with no matching route
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Option<TransportResponse> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    fn push(&self, path: String, reply: Reply) {
        lock(&self.routes).entry(path).or_default().push_back(reply);
    }

    fn next_reply(&self, path: &str) -> Option<Reply> {
        let mut routes = lock(&self.routes);
        let queue = routes.get_mut(path)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    fn dispatch(&self, request: RecordedRequest) -> Result<TransportResponse> {
        lock(&self.requests).push(request.clone());

        match self.next_reply(&request.path) {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::ConnectionError(message)) => {
                Err(ClientError::ConnectionFailed(message).into())
            }
            None => Ok(self
                .handler
                .as_ref()
                .and_then(|handler| handler(&request))
                .unwrap_or_else(|| not_found(&request.path))),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(
        &self,
        tenant: &TenantId,
        path: &str,
        params: Option<&SearchParameters>,
    ) -> Result<TransportResponse> {
        self.dispatch(RecordedRequest {
            method: "GET",
            tenant: tenant.clone(),
            path: path.to_string(),
            params: params.cloned(),
            body: None,
        })
    }

    async fn post(
        &self,
        tenant: &TenantId,
        path: &str,
        body: RequestBody,
        params: Option<&SearchParameters>,
    ) -> Result<TransportResponse> {
        self.dispatch(RecordedRequest {
            method: "POST",
            tenant: tenant.clone(),
            path: path.to_string(),
            params: params.cloned(),
            body: Some(body),
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(path: &str) -> TransportResponse {
    TransportResponse::json(
        404,
        &json!({
            "resourceType": "OperationOutcome",
            "issue": [{
                "severity": "error",
                "code": "not-found",
                "diagnostics": format!("no route for {path}")
            }]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantId {
        TenantId::new("tenant-a").unwrap()
    }

    #[tokio::test]
    async fn test_routes_served_in_order_then_last_repeats() {
        let transport = MemoryTransport::new()
            .route("Condition", TransportResponse::new(200, "first"))
            .route("Condition", TransportResponse::new(200, "second"));

        let t = tenant();
        let bodies = [
            transport.get(&t, "Condition", None).await.unwrap().text(),
            transport.get(&t, "Condition", None).await.unwrap().text(),
            transport.get(&t, "Condition", None).await.unwrap().text(),
        ];
        assert_eq!(bodies, ["first", "second", "second"]);
    }

    #[tokio::test]
    async fn test_unrouted_request_is_not_found() {
        let transport = MemoryTransport::new();
        let response = transport.get(&tenant(), "Nothing", None).await.unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_handler_fallback_sees_params() {
        let transport = MemoryTransport::new().with_handler(|request| {
            request
                .param("_id")
                .map(|ids| TransportResponse::new(200, ids.to_string()))
        });

        let params = SearchParameters::new().with("_id", "a,b");
        let response = transport
            .get(&tenant(), "Location", Some(&params))
            .await
            .unwrap();
        assert_eq!(response.text(), "a,b");
    }

    #[tokio::test]
    async fn test_route_error_is_connection_failure() {
        let transport = MemoryTransport::new().route_error("Condition", "connection reset");
        let err = transport.get(&tenant(), "Condition", None).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_requests_are_recorded() {
        let transport = MemoryTransport::new();
        let t = tenant();
        let _ = transport
            .post(
                &t,
                "Condition/_search",
                RequestBody::Form(vec![("_count".to_string(), "50".to_string())]),
                None,
            )
            .await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].tenant, t);
        assert_eq!(requests[0].form_field("_count"), Some("50"));
    }
}
