//! Generic resource service
//!
//! One engine shared by every resource type. A service is parameterised by
//! its path, default parameters, batch size and codec; nothing else differs
//! between resource types.

use crate::core::search::{
    dedup_by_identifier, BatchFetcher, Paginator, ResourceCodec, ResultMap, SearchParameters,
    DEFAULT_ID_PARAM,
};
use crate::domain::{ResourceId, Result, TenantId};

use super::catalog::ResourceSpec;
use super::resource::Resource;

/// Search and lookup operations for one resource type
#[derive(Clone)]
pub struct ResourceService<R> {
    paginator: Paginator,
    path: String,
    default_params: SearchParameters,
    batch_size: usize,
    id_param: String,
    codec: ResourceCodec<R>,
}

impl<R> ResourceService<R> {
    /// Creates a service with no default parameters and a batch size of 1
    pub fn new(paginator: Paginator, path: impl Into<String>, codec: ResourceCodec<R>) -> Self {
        Self {
            paginator,
            path: path.into(),
            default_params: SearchParameters::new(),
            batch_size: 1,
            id_param: DEFAULT_ID_PARAM.to_string(),
            codec,
        }
    }

    /// Replaces the parameters sent with every search
    pub fn with_default_params(mut self, params: SearchParameters) -> Self {
        self.default_params = params;
        self
    }

    /// Sets the number of identifiers per lookup request
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the query parameter carrying identifiers in lookups
    pub fn with_id_param(mut self, id_param: impl Into<String>) -> Self {
        self.id_param = id_param.into();
        self
    }

    /// Request path relative to the tenant base URL
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Identifiers per lookup request
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Parameters sent with every search
    pub fn default_params(&self) -> &SearchParameters {
        &self.default_params
    }

    /// Runs one search with `filters` over the default parameters and returns
    /// the de-duplicated resources
    pub async fn search(&self, tenant: &TenantId, filters: &SearchParameters) -> Result<Vec<R>> {
        let resources = self.fetch(tenant, filters).await?;
        let unique = dedup_by_identifier(resources, |r| self.codec.identify(r));

        tracing::info!(
            tenant = %tenant,
            resource = %self.path,
            results = unique.len(),
            "Search completed"
        );

        Ok(unique)
    }

    /// Runs several searches one after another and de-duplicates across all
    /// of them
    pub async fn search_all(
        &self,
        tenant: &TenantId,
        filter_sets: &[SearchParameters],
    ) -> Result<Vec<R>> {
        let mut resources = Vec::new();
        for filters in filter_sets {
            resources.extend(self.fetch(tenant, filters).await?);
        }
        let unique = dedup_by_identifier(resources, |r| self.codec.identify(r));

        tracing::info!(
            tenant = %tenant,
            resource = %self.path,
            searches = filter_sets.len(),
            results = unique.len(),
            "Multi-search completed"
        );

        Ok(unique)
    }

    /// Looks up resources by identifier, batching as configured
    pub async fn get_by_ids(&self, tenant: &TenantId, ids: &[String]) -> Result<ResultMap<R>> {
        let fetcher = BatchFetcher::new(self.paginator.clone(), self.batch_size)
            .with_id_param(self.id_param.as_str());

        let results = fetcher
            .fetch_by_identifiers(tenant, &self.path, &self.default_params, ids, &self.codec)
            .await?;

        tracing::info!(
            tenant = %tenant,
            resource = %self.path,
            requested = ids.len(),
            found = results.len(),
            "Identifier lookup completed"
        );

        Ok(results)
    }

    /// Same as [`get_by_ids`](Self::get_by_ids) but returns just the resources,
    /// ordered by identifier
    pub async fn get_list_by_ids(&self, tenant: &TenantId, ids: &[String]) -> Result<Vec<R>> {
        Ok(self.get_by_ids(tenant, ids).await?.into_values().collect())
    }

    /// Reads a single resource at `{path}/{id}`
    ///
    /// Returns `Ok(None)` when the server answers 404.
    pub async fn get_by_id(&self, tenant: &TenantId, id: &ResourceId) -> Result<Option<R>> {
        let path = format!("{}/{}", self.path.trim_end_matches('/'), id);
        let response = self.paginator.transport().get(tenant, &path, None).await?;

        if response.status() == 404 {
            tracing::debug!(tenant = %tenant, path = %path, "Resource not found");
            return Ok(None);
        }

        let body = response.error_for_status()?.decode()?;
        self.codec.decode(body).map(Some)
    }

    async fn fetch(&self, tenant: &TenantId, filters: &SearchParameters) -> Result<Vec<R>> {
        let params = self.default_params.overlay(filters);
        let entries = self
            .paginator
            .fetch_all_pages(tenant, &self.path, &params)
            .await?;
        self.codec.decode_entries(entries)
    }
}

impl ResourceService<Resource> {
    /// Service for a catalog entry
    pub fn from_spec(paginator: Paginator, spec: &ResourceSpec) -> Self {
        ResourceService::new(paginator, spec.path, Resource::codec(spec.resource_type))
            .with_default_params(spec.default_parameters())
            .with_batch_size(spec.batch_size)
            .with_id_param(spec.id_param)
    }
}
