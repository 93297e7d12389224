//! Pagination engine
//!
//! Issues the first search request, then follows `next` links until the
//! server stops returning one. Pages are fetched strictly one after another
//! since each continuation comes from the previous page.

use super::envelope::{Entry, PageEnvelope};
use super::params::SearchParameters;
use super::{SearchMethod, DEFAULT_PAGE_SIZE};
use crate::adapters::transport::{RequestBody, Transport, TransportResponse};
use crate::config::SearchConfig;
use crate::domain::{ClientError, Result, TenantId};
use std::sync::Arc;

/// Follows continuation links across a paged search
///
/// # Example
///
/// ```no_run
/// use conduit::adapters::HttpTransport;
/// use conduit::core::search::{Paginator, SearchParameters};
/// use conduit::domain::TenantId;
/// use std::sync::Arc;
///
/// # async fn example(transport: HttpTransport) -> conduit::domain::Result<()> {
/// let paginator = Paginator::new(Arc::new(transport));
/// let tenant = TenantId::new("acme").unwrap();
/// let params = SearchParameters::new().with("patient", "12724066");
///
/// let entries = paginator.fetch_all_pages(&tenant, "Condition", &params).await?;
/// println!("{} entries", entries.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Paginator {
    transport: Arc<dyn Transport>,
    page_size: usize,
    max_pages: Option<usize>,
    method: SearchMethod,
}

impl Paginator {
    /// Creates a paginator with the standard defaults
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
            method: SearchMethod::Get,
        }
    }

    /// Creates a paginator using the search section of the configuration
    pub fn from_config(transport: Arc<dyn Transport>, config: &SearchConfig) -> Self {
        Self::new(transport)
            .with_page_size(config.page_size)
            .with_max_pages(config.max_pages)
            .with_method(config.method)
    }

    /// Page size injected when the caller doesn't set `_count`
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fails a search once it would fetch more than `max_pages` pages
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// How the first page is requested
    pub fn with_method(mut self, method: SearchMethod) -> Self {
        self.method = method;
        self
    }

    /// The underlying transport
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Fetches every page of a search and returns all entries in fetch order
    ///
    /// Caller parameters are merged over the defaults (`_count`), caller wins.
    /// Continuation URLs are requested verbatim without re-merging parameters.
    /// No de-duplication happens here.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::HttpStatus`] on any non-success page, with
    /// [`ClientError::InvalidResponse`] if a page can't be decoded, and with
    /// [`ClientError::PageLimitExceeded`] when a page cap is set and reached.
    pub async fn fetch_all_pages(
        &self,
        tenant: &TenantId,
        base_path: &str,
        params: &SearchParameters,
    ) -> Result<Vec<Entry>> {
        let merged = params.merged_with_defaults(Some(self.page_size));

        let mut page = decode_page(self.first_page(tenant, base_path, &merged).await?)?;
        let mut entries = Vec::new();
        let mut pages = 1usize;

        loop {
            let next = page.next_url().map(str::to_owned);

            tracing::debug!(
                tenant = %tenant,
                path = %base_path,
                page = pages,
                entries = page.entry.len(),
                has_next = next.is_some(),
                "Fetched search page"
            );

            entries.extend(page.entry);

            let Some(next_url) = next else {
                break;
            };

            if let Some(limit) = self.max_pages {
                if pages >= limit {
                    tracing::warn!(
                        tenant = %tenant,
                        path = %base_path,
                        limit = limit,
                        "Search exceeded page limit"
                    );
                    return Err(ClientError::PageLimitExceeded {
                        limit,
                        path: base_path.to_string(),
                    }
                    .into());
                }
            }

            page = decode_page(self.transport.get(tenant, &next_url, None).await?)?;
            pages += 1;
        }

        tracing::debug!(
            tenant = %tenant,
            path = %base_path,
            pages = pages,
            entries = entries.len(),
            "Search complete"
        );

        Ok(entries)
    }

    async fn first_page(
        &self,
        tenant: &TenantId,
        base_path: &str,
        params: &SearchParameters,
    ) -> Result<TransportResponse> {
        match self.method {
            SearchMethod::Get => self.transport.get(tenant, base_path, Some(params)).await,
            SearchMethod::Post => {
                let path = format!("{}/_search", base_path.trim_end_matches('/'));
                let body = RequestBody::Form(params.to_query_pairs());
                self.transport.post(tenant, &path, body, None).await
            }
        }
    }
}

fn decode_page(response: TransportResponse) -> Result<PageEnvelope> {
    response.error_for_status()?.decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryTransport;
    use crate::domain::ConduitError;
    use serde_json::{json, Value};

    const NEXT: &str = "https://fhir.example.com/r4/Condition?page=2";

    fn tenant() -> TenantId {
        TenantId::new("tenant-a").unwrap()
    }

    fn bundle(ids: &[&str], next: Option<&str>) -> TransportResponse {
        let mut links = vec![json!({"relation": "self", "url": "https://fhir.example.com/r4/Condition"})];
        if let Some(url) = next {
            links.push(json!({"relation": "next", "url": url}));
        }
        let entries: Vec<Value> = ids
            .iter()
            .map(|id| json!({"resource": {"resourceType": "Condition", "id": id}}))
            .collect();
        TransportResponse::json(
            200,
            &json!({"resourceType": "Bundle", "type": "searchset", "link": links, "entry": entries}),
        )
    }

    fn ids(entries: &[Entry]) -> Vec<String> {
        entries
            .iter()
            .filter_map(|e| e.resource.as_ref())
            .filter_map(|r| r["id"].as_str().map(str::to_string))
            .collect()
    }

    #[tokio::test]
    async fn test_follows_next_until_absent() {
        let transport = Arc::new(
            MemoryTransport::new()
                .route("Condition", bundle(&["1", "2"], Some(NEXT)))
                .route(NEXT, bundle(&["3", "4"], None)),
        );
        let paginator = Paginator::new(transport.clone());

        let entries = paginator
            .fetch_all_pages(&tenant(), "Condition", &SearchParameters::new())
            .await
            .unwrap();

        assert_eq!(ids(&entries), vec!["1", "2", "3", "4"]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_continuation_url_used_verbatim() {
        let transport = Arc::new(
            MemoryTransport::new()
                .route("Condition", bundle(&["1"], Some(NEXT)))
                .route(NEXT, bundle(&["2"], None)),
        );
        let paginator = Paginator::new(transport.clone());
        let params = SearchParameters::new().with("patient", "12724066");

        paginator
            .fetch_all_pages(&tenant(), "Condition", &params)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[1].path, NEXT);
        assert_eq!(requests[1].params, None);
    }

    #[tokio::test]
    async fn test_default_page_size_injected() {
        let transport = Arc::new(MemoryTransport::new().route("Condition", bundle(&[], None)));
        let paginator = Paginator::new(transport.clone());

        paginator
            .fetch_all_pages(&tenant(), "Condition", &SearchParameters::new())
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(
            requests[0].params,
            Some(SearchParameters::new().with("_count", "50"))
        );
    }

    #[tokio::test]
    async fn test_caller_page_size_wins() {
        let transport = Arc::new(MemoryTransport::new().route("Condition", bundle(&[], None)));
        let paginator = Paginator::new(transport.clone()).with_page_size(100);
        let params = SearchParameters::new().with("_count", 250usize);

        paginator
            .fetch_all_pages(&tenant(), "Condition", &params)
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].params,
            Some(SearchParameters::new().with("_count", "250"))
        );
    }

    #[tokio::test]
    async fn test_duplicates_are_not_removed_at_this_layer() {
        let transport = Arc::new(
            MemoryTransport::new()
                .route("Condition", bundle(&["12345", "1"], Some(NEXT)))
                .route(NEXT, bundle(&["12345"], None)),
        );
        let paginator = Paginator::new(transport);

        let entries = paginator
            .fetch_all_pages(&tenant(), "Condition", &SearchParameters::new())
            .await
            .unwrap();

        assert_eq!(ids(&entries), vec!["12345", "1", "12345"]);
    }

    #[tokio::test]
    async fn test_blank_next_url_ends_pagination() {
        let transport = Arc::new(MemoryTransport::new().route(
            "Condition",
            TransportResponse::json(
                200,
                &json!({
                    "entry": [{"resource": {"id": "1"}}],
                    "link": [{"relation": "next", "url": " "}, {"url": NEXT}]
                }),
            ),
        ));
        let paginator = Paginator::new(transport.clone());

        let entries = paginator
            .fetch_all_pages(&tenant(), "Condition", &SearchParameters::new())
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let transport = Arc::new(
            MemoryTransport::new().route("Condition", TransportResponse::json(200, &json!({}))),
        );
        let entries = Paginator::new(transport)
            .fetch_all_pages(&tenant(), "Condition", &SearchParameters::new())
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_on_later_page_fails_search() {
        let transport = Arc::new(
            MemoryTransport::new()
                .route("Condition", bundle(&["1"], Some(NEXT)))
                .route(NEXT, TransportResponse::new(500, "upstream exploded")),
        );

        let err = Paginator::new(transport)
            .fetch_all_pages(&tenant(), "Condition", &SearchParameters::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let transport =
            Arc::new(MemoryTransport::new().route_error("Condition", "connection reset"));

        let err = Paginator::new(transport)
            .fetch_all_pages(&tenant(), "Condition", &SearchParameters::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConduitError::Client(ClientError::ConnectionFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_page_limit() {
        let transport = Arc::new(
            MemoryTransport::new()
                .route("Condition", bundle(&["1"], Some(NEXT)))
                .route(NEXT, bundle(&["2"], Some(NEXT))),
        );
        let paginator = Paginator::new(transport.clone()).with_max_pages(Some(3));

        let err = paginator
            .fetch_all_pages(&tenant(), "Condition", &SearchParameters::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConduitError::Client(ClientError::PageLimitExceeded { limit: 3, .. })
        ));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_post_search_sends_form_then_follows_with_get() {
        let transport = Arc::new(
            MemoryTransport::new()
                .route("Observation/_search", bundle(&["1"], Some(NEXT)))
                .route(NEXT, bundle(&["2"], None)),
        );
        let paginator = Paginator::new(transport.clone()).with_method(SearchMethod::Post);
        let params = SearchParameters::new().with("patient", "12724066");

        let entries = paginator
            .fetch_all_pages(&tenant(), "Observation", &params)
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        let requests = transport.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].form_field("_count"), Some("50"));
        assert_eq!(requests[0].form_field("patient"), Some("12724066"));
        assert_eq!(requests[1].method, "GET");
        assert_eq!(requests[1].path, NEXT);
    }

    #[tokio::test]
    async fn test_repeated_search_is_identical() {
        let transport = Arc::new(
            MemoryTransport::new()
                .route("Condition", bundle(&["1", "2"], Some(NEXT)))
                .route(NEXT, bundle(&["3"], None)),
        );
        let paginator = Paginator::new(transport);
        let params = SearchParameters::new().with("patient", "1");

        let first = paginator
            .fetch_all_pages(&tenant(), "Condition", &params)
            .await
            .unwrap();
        let second = paginator
            .fetch_all_pages(&tenant(), "Condition", &params)
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
