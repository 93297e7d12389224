//! Identifier batching
//!
//! Upstream APIs cap how many identifiers one search may carry. Lookups are
//! split into ordered chunks, each chunk is searched through the
//! [`Paginator`], and the chunk results are merged into one map.

use std::collections::{BTreeMap, HashSet};

use super::codec::ResourceCodec;
use super::paginator::Paginator;
use super::params::SearchParameters;
use super::DEFAULT_ID_PARAM;
use crate::domain::{ConduitError, Result, TenantId};

/// Identifier to resource
pub type ResultMap<R> = BTreeMap<String, R>;

/// De-duplicates `ids` (first occurrence kept) and splits them into ordered
/// chunks of at most `batch_size`
///
/// # Errors
///
/// Returns [`ConduitError::Validation`] when `batch_size` is zero.
///
/// # Example
///
/// ```
/// use conduit::core::search::chunk_identifiers;
///
/// let ids = ["a", "b", "c", "a", "d", "e"].map(String::from);
/// let chunks = chunk_identifiers(&ids, 4).unwrap();
/// assert_eq!(chunks, vec![vec!["a", "b", "c", "d"], vec!["e"]]);
/// ```
pub fn chunk_identifiers(ids: &[String], batch_size: usize) -> Result<Vec<Vec<String>>> {
    if batch_size == 0 {
        return Err(ConduitError::Validation(
            "batch size must be at least 1".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    let unique: Vec<String> = ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();

    Ok(unique
        .chunks(batch_size)
        .map(<[String]>::to_vec)
        .collect())
}

/// Looks up resources by identifier in bounded chunks
#[derive(Clone)]
pub struct BatchFetcher {
    paginator: Paginator,
    batch_size: usize,
    id_param: String,
}

impl BatchFetcher {
    /// Creates a fetcher sending at most `batch_size` identifiers per search
    pub fn new(paginator: Paginator, batch_size: usize) -> Self {
        Self {
            paginator,
            batch_size,
            id_param: DEFAULT_ID_PARAM.to_string(),
        }
    }

    /// Query parameter the comma-joined identifiers go into
    pub fn with_id_param(mut self, id_param: impl Into<String>) -> Self {
        self.id_param = id_param.into();
        self
    }

    /// Configured chunk size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Query parameter used for identifiers
    pub fn id_param(&self) -> &str {
        &self.id_param
    }

    /// Fetches every resource named in `ids`
    ///
    /// Chunks are searched in order, one paginated search each. Within a
    /// chunk a later entry for the same identifier replaces an earlier one;
    /// an identifier already filled by an earlier chunk is left alone.
    /// Entries the server returns for identifiers that weren't asked for are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConduitError::Validation`] for a zero batch size. Any failing
    /// chunk fails the whole lookup.
    pub async fn fetch_by_identifiers<R>(
        &self,
        tenant: &TenantId,
        base_path: &str,
        base_params: &SearchParameters,
        ids: &[String],
        codec: &ResourceCodec<R>,
    ) -> Result<ResultMap<R>> {
        let chunks = chunk_identifiers(ids, self.batch_size)?;
        let mut results = ResultMap::new();

        for (index, chunk) in chunks.iter().enumerate() {
            let params = base_params.overlay(
                &SearchParameters::new().with(self.id_param.as_str(), chunk.join(",")),
            );

            tracing::debug!(
                tenant = %tenant,
                path = %base_path,
                chunk = index + 1,
                chunks = chunks.len(),
                ids = chunk.len(),
                "Fetching identifier chunk"
            );

            let entries = self
                .paginator
                .fetch_all_pages(tenant, base_path, &params)
                .await?;

            let mut chunk_map = ResultMap::new();
            for resource in codec.decode_entries(entries)? {
                match codec.identify(&resource) {
                    Some(id) => {
                        chunk_map.insert(id, resource);
                    }
                    None => {
                        tracing::warn!(
                            tenant = %tenant,
                            path = %base_path,
                            "Skipping resource without identifier in batch lookup"
                        );
                    }
                }
            }

            for (id, resource) in chunk_map {
                results.entry(id).or_insert(resource);
            }
        }

        Ok(results)
    }
}
