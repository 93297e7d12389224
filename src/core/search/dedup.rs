//! De-duplication of search results by resource identifier

use std::collections::HashMap;

/// Collapses resources sharing an identifier into one
///
/// A later occurrence replaces the earlier one but keeps the earlier one's
/// position. Resources without an identifier cannot be compared and are kept.
pub fn dedup_by_identifier<R, F>(resources: Vec<R>, identify: F) -> Vec<R>
where
    F: Fn(&R) -> Option<String>,
{
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(resources.len());
    let mut unique: Vec<R> = Vec::with_capacity(resources.len());

    for resource in resources {
        match identify(&resource) {
            Some(id) => match positions.get(&id) {
                Some(&index) => unique[index] = resource,
                None => {
                    positions.insert(id, unique.len());
                    unique.push(resource);
                }
            },
            None => unique.push(resource),
        }
    }

    unique
}
