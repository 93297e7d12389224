//! Domain identifier types with validation
//!
//! Newtype wrappers keep tenant identifiers and resource identifiers from being
//! mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tenant identifier newtype wrapper
///
/// Selects which customer/institution endpoint and credentials the transport
/// uses. Opaque to the search core.
///
/// # Examples
///
/// ```
/// use conduit::domain::ids::TenantId;
/// use std::str::FromStr;
///
/// let tenant = TenantId::from_str("st-olaf-health").unwrap();
/// assert_eq!(tenant.as_str(), "st-olaf-health");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new TenantId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Tenant ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the tenant ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resource identifier newtype wrapper
///
/// The logical id of a resource within its resource type (`Condition/123` has
/// the id `123`). FHIR restricts ids to `[A-Za-z0-9\-\.]{1,64}`.
///
/// # Examples
///
/// ```
/// use conduit::domain::ids::ResourceId;
///
/// let id = ResourceId::new("12345").unwrap();
/// assert_eq!(id.as_str(), "12345");
/// assert!(ResourceId::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    /// Maximum length of a FHIR logical id
    pub const MAX_LEN: usize = 64;

    /// Creates a new ResourceId, validating the FHIR id character set
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("Resource ID cannot be empty".to_string());
        }
        if id.len() > Self::MAX_LEN {
            return Err(format!(
                "Resource ID exceeds {} characters: {}",
                Self::MAX_LEN,
                id
            ));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(format!("Resource ID contains invalid characters: {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the resource ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_valid() {
        let tenant = TenantId::new("tenant-a").unwrap();
        assert_eq!(tenant.as_str(), "tenant-a");
        assert_eq!(tenant.to_string(), "tenant-a");
    }

    #[test]
    fn test_tenant_id_blank_rejected() {
        assert!(TenantId::new("").is_err());
        assert!(TenantId::new("   ").is_err());
    }

    #[test]
    fn test_resource_id_valid() {
        let id = ResourceId::new("eXDl.Nw-3").unwrap();
        assert_eq!(id.as_str(), "eXDl.Nw-3");
        assert_eq!(id.into_inner(), "eXDl.Nw-3");
    }

    #[test]
    fn test_resource_id_invalid_characters() {
        assert!(ResourceId::new("a/b").is_err());
        assert!(ResourceId::new("a,b").is_err());
        assert!(ResourceId::new("").is_err());
    }

    #[test]
    fn test_resource_id_too_long() {
        let long = "a".repeat(ResourceId::MAX_LEN + 1);
        assert!(ResourceId::new(long).is_err());
        assert!(ResourceId::new("a".repeat(ResourceId::MAX_LEN)).is_ok());
    }

    #[test]
    fn test_resource_id_serialization() {
        let id = ResourceId::new("12345").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"12345\"");
        let back: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
