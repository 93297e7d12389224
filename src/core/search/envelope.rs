//! Paged search result envelope
//!
//! Wire shape of a search response page: an `entry` list, each wrapping one
//! resource, and a `link` list carrying the continuation cursor.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::NEXT_RELATION;

/// One decoded page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope {
    /// Entries on this page, in server order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entry: Vec<Entry>,

    /// Navigation links (`self`, `next`, `previous`, ...)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: Vec<Link>,

    /// Server-reported total, when the vendor includes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl PageEnvelope {
    /// URL of the next page, if this page has a usable continuation link
    ///
    /// Only the first link with relation `"next"` (case-sensitive) and a
    /// non-blank url counts. Links with an absent relation, an absent or null
    /// url, or a blank url are ignored.
    pub fn next_url(&self) -> Option<&str> {
        self.link.iter().find_map(|link| {
            if link.relation.as_deref() == Some(NEXT_RELATION) {
                link.target()
            } else {
                None
            }
        })
    }
}

/// Navigation link within a page envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation label
    #[serde(default)]
    pub relation: Option<String>,

    /// Absolute target URL
    #[serde(default)]
    pub url: Option<String>,
}

impl Link {
    /// Builds a link with both fields present
    pub fn new(relation: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            relation: Some(relation.into()),
            url: Some(url.into()),
        }
    }

    /// Target URL, unless absent or blank
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// One entry of a page, wrapping a single resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Absolute URL of the resource
    #[serde(rename = "fullUrl", default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// The resource payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    /// Search metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<EntrySearch>,
}

impl Entry {
    /// Wraps a resource payload
    pub fn new(resource: Value) -> Self {
        Self {
            full_url: None,
            resource: Some(resource),
            search: None,
        }
    }

    fn mode(&self) -> Option<&str> {
        self.search.as_ref().and_then(|s| s.mode.as_deref())
    }

    /// Whether the entry is a server-side annotation (`search.mode == "outcome"`)
    /// rather than a search match
    pub fn is_outcome(&self) -> bool {
        self.mode() == Some("outcome")
    }

    /// Whether the entry was pulled in by `_include`/`_revinclude`
    pub fn is_include(&self) -> bool {
        self.mode() == Some("include")
    }
}

/// Search metadata attached to an entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntrySearch {
    /// `match`, `include` or `outcome`
    #[serde(default)]
    pub mode: Option<String>,
}

/// Treats an explicit `null` list the same as an absent one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
