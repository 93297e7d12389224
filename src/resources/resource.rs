//! Resource types and the generic resource value

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::core::search::ResourceCodec;
use crate::domain::{ClientError, ConduitError, Result};

/// Resource types the client knows how to search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    AllergyIntolerance,
    Appointment,
    CarePlan,
    Condition,
    Coverage,
    DiagnosticReport,
    DocumentReference,
    Encounter,
    Goal,
    Immunization,
    Location,
    Medication,
    MedicationRequest,
    Observation,
    Organization,
    Patient,
    Practitioner,
    PractitionerRole,
    Procedure,
    RequestGroup,
    ServiceRequest,
}

impl ResourceType {
    /// Every supported resource type, alphabetically
    pub const ALL: [ResourceType; 21] = [
        ResourceType::AllergyIntolerance,
        ResourceType::Appointment,
        ResourceType::CarePlan,
        ResourceType::Condition,
        ResourceType::Coverage,
        ResourceType::DiagnosticReport,
        ResourceType::DocumentReference,
        ResourceType::Encounter,
        ResourceType::Goal,
        ResourceType::Immunization,
        ResourceType::Location,
        ResourceType::Medication,
        ResourceType::MedicationRequest,
        ResourceType::Observation,
        ResourceType::Organization,
        ResourceType::Patient,
        ResourceType::Practitioner,
        ResourceType::PractitionerRole,
        ResourceType::Procedure,
        ResourceType::RequestGroup,
        ResourceType::ServiceRequest,
    ];

    /// Name as it appears in `resourceType` and in request paths
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::AllergyIntolerance => "AllergyIntolerance",
            ResourceType::Appointment => "Appointment",
            ResourceType::CarePlan => "CarePlan",
            ResourceType::Condition => "Condition",
            ResourceType::Coverage => "Coverage",
            ResourceType::DiagnosticReport => "DiagnosticReport",
            ResourceType::DocumentReference => "DocumentReference",
            ResourceType::Encounter => "Encounter",
            ResourceType::Goal => "Goal",
            ResourceType::Immunization => "Immunization",
            ResourceType::Location => "Location",
            ResourceType::Medication => "Medication",
            ResourceType::MedicationRequest => "MedicationRequest",
            ResourceType::Observation => "Observation",
            ResourceType::Organization => "Organization",
            ResourceType::Patient => "Patient",
            ResourceType::Practitioner => "Practitioner",
            ResourceType::PractitionerRole => "PractitionerRole",
            ResourceType::Procedure => "Procedure",
            ResourceType::RequestGroup => "RequestGroup",
            ResourceType::ServiceRequest => "ServiceRequest",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ConduitError;

    /// Parses a resource type name, ignoring ASCII case
    fn from_str(s: &str) -> Result<Self> {
        ResourceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConduitError::Validation(format!("unknown resource type '{s}'")))
    }
}

/// A resource as returned by the vendor
///
/// The payload is kept as JSON; only the type and identifier are lifted out.
/// Serializes as the original payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    resource_type: ResourceType,
    id: Option<String>,
    body: Value,
}

impl Resource {
    /// Wraps a payload of the expected type
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidResponse`] if the payload isn't a JSON
    /// object or declares a different `resourceType`.
    pub fn from_value(expected: ResourceType, body: Value) -> Result<Self> {
        let object = body.as_object().ok_or_else(|| {
            ClientError::InvalidResponse(format!("{expected} payload is not a JSON object"))
        })?;

        if let Some(declared) = object.get("resourceType").and_then(Value::as_str) {
            if declared != expected.as_str() {
                return Err(ClientError::InvalidResponse(format!(
                    "expected {expected}, got {declared}"
                ))
                .into());
            }
        }

        let id = object
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Ok(Self {
            resource_type: expected,
            id,
            body,
        })
    }

    /// Codec decoding payloads of `resource_type` into [`Resource`]
    pub fn codec(resource_type: ResourceType) -> ResourceCodec<Resource> {
        ResourceCodec::new(
            move |value| Resource::from_value(resource_type, value),
            |resource: &Resource| resource.id.clone(),
        )
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Server-assigned identifier
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Top-level field of the payload
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}
