//! Per-resource decoding strategy
//!
//! A [`ResourceCodec`] pairs a decoder (raw JSON to typed resource) with an
//! identifier extractor. Services pick one at construction time; the paging
//! and chunking code never inspects resource payloads itself.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::envelope::Entry;
use crate::domain::{ClientError, Result};

type DecodeFn<R> = dyn Fn(Value) -> Result<R> + Send + Sync;
type IdentifyFn<R> = dyn Fn(&R) -> Option<String> + Send + Sync;

/// Decoder plus identifier extractor for one resource type
pub struct ResourceCodec<R> {
    decode: Arc<DecodeFn<R>>,
    identify: Arc<IdentifyFn<R>>,
}

impl<R> Clone for ResourceCodec<R> {
    fn clone(&self) -> Self {
        Self {
            decode: Arc::clone(&self.decode),
            identify: Arc::clone(&self.identify),
        }
    }
}

impl<R> fmt::Debug for ResourceCodec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCodec").finish_non_exhaustive()
    }
}

impl<R> ResourceCodec<R> {
    /// Builds a codec from explicit functions
    pub fn new<D, I>(decode: D, identify: I) -> Self
    where
        D: Fn(Value) -> Result<R> + Send + Sync + 'static,
        I: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(decode),
            identify: Arc::new(identify),
        }
    }

    /// Decodes one resource payload
    pub fn decode(&self, value: Value) -> Result<R> {
        (self.decode)(value)
    }

    /// Identifier the resource declares about itself
    pub fn identify(&self, resource: &R) -> Option<String> {
        (self.identify)(resource)
    }

    /// Decodes the resources of a page's entries, in order
    ///
    /// Entries without a resource, `outcome` annotations and `include`
    /// entries are skipped. Only matches are decoded.
    pub fn decode_entries(&self, entries: Vec<Entry>) -> Result<Vec<R>> {
        let mut resources = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.is_outcome() {
                tracing::debug!("Skipping outcome entry in search results");
                continue;
            }
            if entry.is_include() {
                tracing::debug!(full_url = ?entry.full_url, "Skipping included entry in search results");
                continue;
            }
            match entry.resource {
                Some(value) => resources.push(self.decode(value)?),
                None => {
                    tracing::debug!(full_url = ?entry.full_url, "Skipping entry without resource");
                }
            }
        }
        Ok(resources)
    }
}

impl<R> ResourceCodec<R>
where
    R: DeserializeOwned + 'static,
{
    /// Codec for any serde-deserializable type, with a caller-supplied id extractor
    pub fn from_serde<I>(identify: I) -> Self
    where
        I: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(
            |value| {
                serde_json::from_value(value)
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()).into())
            },
            identify,
        )
    }
}

impl ResourceCodec<Value> {
    /// Pass-through codec reading the top-level `id` field
    pub fn json() -> Self {
        Self::new(Ok, |value: &Value| {
            value.get("id").and_then(Value::as_str).map(str::to_string)
        })
    }
}
