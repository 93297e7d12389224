//! Core search protocol for Conduit.
//!
//! # Modules
//!
//! - [`search`] - Pagination, identifier batching and de-duplication
//!
//! # Search Workflow
//!
//! 1. **Merge**: caller parameters over the resource defaults and `_count`
//! 2. **Page**: fetch the first page, then follow `next` links
//! 3. **Decode**: turn entries into typed resources, skipping outcomes
//! 4. **Collapse**: de-duplicate by resource identifier
//!
//! Identifier lookups run the same workflow once per chunk of identifiers and
//! merge the chunk results into an identifier-keyed map.

pub mod search;
