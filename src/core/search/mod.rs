//! Paginated search and batched lookup
//!
//! Everything a resource service needs to talk to a paged search API:
//!
//! - [`params`] - Ordered query parameters with default merging
//! - [`envelope`] - Wire shape of a result page and its continuation links
//! - [`paginator`] - Follows `next` links until the result set is exhausted
//! - [`batch`] - Splits identifier lookups into bounded chunks
//! - [`codec`] - Per-resource decoder and identifier extractor
//! - [`dedup`] - Collapses results that share an identifier

pub mod batch;
pub mod codec;
pub mod dedup;
pub mod envelope;
pub mod paginator;
pub mod params;

pub use batch::{chunk_identifiers, BatchFetcher, ResultMap};
pub use codec::ResourceCodec;
pub use dedup::dedup_by_identifier;
pub use envelope::{Entry, EntrySearch, Link, PageEnvelope};
pub use paginator::Paginator;
pub use params::{ParamValue, SearchParameters};

use serde::{Deserialize, Serialize};

/// Query parameter carrying the page size
pub const PAGE_SIZE_PARAM: &str = "_count";

/// Page size injected when the caller doesn't supply one
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Link relation that marks the continuation cursor
pub const NEXT_RELATION: &str = "next";

/// Query parameter used for identifier lookups unless a resource overrides it
pub const DEFAULT_ID_PARAM: &str = "_id";

/// How the first page of a search is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    /// `GET {path}?params`
    #[default]
    Get,
    /// `POST {path}/_search` with form-encoded params
    Post,
}

impl std::fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMethod::Get => write!(f, "get"),
            SearchMethod::Post => write!(f, "post"),
        }
    }
}
