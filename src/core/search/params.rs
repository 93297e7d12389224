//! Search parameter sets
//!
//! An insertion-ordered mapping from query-parameter name to value. Ordering is
//! kept so that the query string a service sends is stable across calls.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_PAGE_SIZE, PAGE_SIZE_PARAM};

/// Value of a single search parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Plain scalar, sent as `name=value`
    Single(String),
    /// Repeatable parameter, sent as `name=a&name=b`
    Repeated(Vec<String>),
}

impl ParamValue {
    /// Query pairs this value expands to under `name`
    fn pairs<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let values: Vec<&'a str> = match self {
            ParamValue::Single(v) => vec![v.as_str()],
            ParamValue::Repeated(vs) => vs.iter().map(String::as_str).collect(),
        };
        values.into_iter().map(move |v| (name, v))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Repeated(values)
    }
}

/// Ordered search parameter mapping
///
/// # Examples
///
/// ```
/// use conduit::core::search::SearchParameters;
///
/// let defaults = SearchParameters::new().with("_count", 50usize);
/// let caller = SearchParameters::new()
///     .with("_count", 250usize)
///     .with("patient", "12724066");
///
/// let merged = defaults.overlay(&caller);
/// assert_eq!(merged.get_single("_count"), Some("250"));
/// assert_eq!(merged.get_single("patient"), Some("12724066"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    entries: Vec<(String, ParamValue)>,
}

impl SearchParameters {
    /// Creates an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter set holding only the page size
    pub fn with_page_size(page_size: usize) -> Self {
        Self::new().with(PAGE_SIZE_PARAM, page_size)
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a parameter, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Looks up a parameter
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Looks up a scalar parameter
    pub fn get_single(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Single(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Whether the parameter is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of distinct parameter names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameters are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameter names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns a copy of `self` with every parameter of `overrides` applied on top.
    /// Keys present in `overrides` win.
    pub fn overlay(&self, overrides: &SearchParameters) -> SearchParameters {
        let mut merged = self.clone();
        for (name, value) in &overrides.entries {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }

    /// Merges caller parameters over the standard defaults
    /// (`_count` = [`DEFAULT_PAGE_SIZE`] unless `page_size` says otherwise).
    pub fn merged_with_defaults(&self, page_size: Option<usize>) -> SearchParameters {
        SearchParameters::with_page_size(page_size.unwrap_or(DEFAULT_PAGE_SIZE)).overlay(self)
    }

    /// Flattens into query pairs; repeatable values expand into one pair each
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(name, value)| value.pairs(name))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Parses `name=value` strings, as given on the command line
    ///
    /// Repeating a name turns it into a repeatable parameter.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = SearchParameters::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected name=value, got '{pair}'"))?;
            if name.is_empty() {
                return Err(format!("parameter name cannot be empty in '{pair}'"));
            }
            let value = match params.get(name) {
                Some(ParamValue::Single(prev)) => {
                    ParamValue::Repeated(vec![prev.clone(), value.to_string()])
                }
                Some(ParamValue::Repeated(prev)) => {
                    let mut values = prev.clone();
                    values.push(value.to_string());
                    ParamValue::Repeated(values)
                }
                None => ParamValue::Single(value.to_string()),
            };
            params.insert(name, value);
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_get_default_page_size() {
        let merged = SearchParameters::new().merged_with_defaults(None);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get_single("_count"), Some("50"));
    }

    #[test]
    fn test_caller_page_size_is_not_overwritten() {
        let caller = SearchParameters::new().with("_count", 250usize);
        let merged = caller.merged_with_defaults(None);
        assert_eq!(merged, SearchParameters::new().with("_count", "250"));
    }

    #[test]
    fn test_configured_page_size_used_as_default() {
        let merged = SearchParameters::new().merged_with_defaults(Some(100));
        assert_eq!(merged.get_single("_count"), Some("100"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = SearchParameters::new()
            .with("patient", "1")
            .with("category", "vital-signs");
        params.insert("patient", "2");

        assert_eq!(params.names().collect::<Vec<_>>(), vec!["patient", "category"]);
        assert_eq!(params.get_single("patient"), Some("2"));
    }

    #[test]
    fn test_overlay_keeps_default_order_then_appends() {
        let defaults = SearchParameters::new()
            .with("_count", 50usize)
            .with("category", "problem-list-item");
        let caller = SearchParameters::new()
            .with("patient", "12724066")
            .with("category", "encounter-diagnosis");

        let merged = defaults.overlay(&caller);
        assert_eq!(
            merged.to_query_pairs(),
            vec![
                ("_count".to_string(), "50".to_string()),
                ("category".to_string(), "encounter-diagnosis".to_string()),
                ("patient".to_string(), "12724066".to_string()),
            ]
        );
    }

    #[test]
    fn test_repeated_values_expand() {
        let params = SearchParameters::new().with(
            "date",
            vec!["ge2024-01-01".to_string(), "lt2024-02-01".to_string()],
        );
        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("date".to_string(), "ge2024-01-01".to_string()),
                ("date".to_string(), "lt2024-02-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_pairs() {
        let params =
            SearchParameters::from_pairs(["patient=1", "date=ge2024", "date=lt2025"]).unwrap();
        assert_eq!(params.get_single("patient"), Some("1"));
        assert_eq!(
            params.get("date"),
            Some(&ParamValue::Repeated(vec![
                "ge2024".to_string(),
                "lt2025".to_string()
            ]))
        );
    }

    #[test]
    fn test_from_pairs_keeps_equals_in_value() {
        let params = SearchParameters::from_pairs(["code=http://loinc.org|8867-4"]).unwrap();
        assert_eq!(params.get_single("code"), Some("http://loinc.org|8867-4"));

        let params = SearchParameters::from_pairs(["_filter=a=b"]).unwrap();
        assert_eq!(params.get_single("_filter"), Some("a=b"));
    }

    #[test]
    fn test_from_pairs_rejects_malformed() {
        assert!(SearchParameters::from_pairs(["patient"]).is_err());
        assert!(SearchParameters::from_pairs(["=1"]).is_err());
    }
}
