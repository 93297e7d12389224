//! Per-resource search settings
//!
//! One [`ResourceSpec`] per supported resource type. Batch sizes reflect what
//! the vendor accepts in a single `_id` search; types it won't batch stay at 1.

use super::resource::ResourceType;
use crate::core::search::{SearchParameters, DEFAULT_ID_PARAM};

/// Static search settings for one resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    pub resource_type: ResourceType,
    /// Request path relative to the tenant base URL
    pub path: &'static str,
    /// Parameters sent with every search unless the caller overrides them
    pub default_params: &'static [(&'static str, &'static str)],
    /// Identifiers per lookup request
    pub batch_size: usize,
    /// Query parameter carrying identifiers in lookups
    pub id_param: &'static str,
}

impl ResourceSpec {
    const fn plain(resource_type: ResourceType, path: &'static str, batch_size: usize) -> Self {
        Self {
            resource_type,
            path,
            default_params: &[],
            batch_size,
            id_param: DEFAULT_ID_PARAM,
        }
    }

    pub fn name(&self) -> &'static str {
        self.resource_type.as_str()
    }

    /// Default parameters as a [`SearchParameters`] set
    pub fn default_parameters(&self) -> SearchParameters {
        self.default_params
            .iter()
            .fold(SearchParameters::new(), |params, (name, value)| {
                params.with(*name, *value)
            })
    }
}

pub const ALLERGY_INTOLERANCE: ResourceSpec =
    ResourceSpec::plain(ResourceType::AllergyIntolerance, "AllergyIntolerance", 1);
pub const APPOINTMENT: ResourceSpec =
    ResourceSpec::plain(ResourceType::Appointment, "Appointment", 1);
pub const CARE_PLAN: ResourceSpec = ResourceSpec::plain(ResourceType::CarePlan, "CarePlan", 1);
pub const CONDITION: ResourceSpec = ResourceSpec {
    default_params: &[("category", "problem-list-item,encounter-diagnosis")],
    ..ResourceSpec::plain(ResourceType::Condition, "Condition", 10)
};
pub const COVERAGE: ResourceSpec = ResourceSpec::plain(ResourceType::Coverage, "Coverage", 1);
pub const DIAGNOSTIC_REPORT: ResourceSpec =
    ResourceSpec::plain(ResourceType::DiagnosticReport, "DiagnosticReport", 1);
pub const DOCUMENT_REFERENCE: ResourceSpec =
    ResourceSpec::plain(ResourceType::DocumentReference, "DocumentReference", 1);
pub const ENCOUNTER: ResourceSpec = ResourceSpec::plain(ResourceType::Encounter, "Encounter", 10);
pub const GOAL: ResourceSpec = ResourceSpec::plain(ResourceType::Goal, "Goal", 1);
pub const IMMUNIZATION: ResourceSpec =
    ResourceSpec::plain(ResourceType::Immunization, "Immunization", 1);
pub const LOCATION: ResourceSpec = ResourceSpec::plain(ResourceType::Location, "Location", 10);
pub const MEDICATION: ResourceSpec =
    ResourceSpec::plain(ResourceType::Medication, "Medication", 10);
pub const MEDICATION_REQUEST: ResourceSpec =
    ResourceSpec::plain(ResourceType::MedicationRequest, "MedicationRequest", 1);
pub const OBSERVATION: ResourceSpec =
    ResourceSpec::plain(ResourceType::Observation, "Observation", 1);
pub const ORGANIZATION: ResourceSpec =
    ResourceSpec::plain(ResourceType::Organization, "Organization", 10);
pub const PATIENT: ResourceSpec = ResourceSpec::plain(ResourceType::Patient, "Patient", 10);
pub const PRACTITIONER: ResourceSpec =
    ResourceSpec::plain(ResourceType::Practitioner, "Practitioner", 10);
pub const PRACTITIONER_ROLE: ResourceSpec =
    ResourceSpec::plain(ResourceType::PractitionerRole, "PractitionerRole", 10);
pub const PROCEDURE: ResourceSpec = ResourceSpec::plain(ResourceType::Procedure, "Procedure", 1);
pub const REQUEST_GROUP: ResourceSpec =
    ResourceSpec::plain(ResourceType::RequestGroup, "RequestGroup", 1);
pub const SERVICE_REQUEST: ResourceSpec =
    ResourceSpec::plain(ResourceType::ServiceRequest, "ServiceRequest", 1);

/// Settings for `resource_type`
pub fn spec(resource_type: ResourceType) -> &'static ResourceSpec {
    match resource_type {
        ResourceType::AllergyIntolerance => &ALLERGY_INTOLERANCE,
        ResourceType::Appointment => &APPOINTMENT,
        ResourceType::CarePlan => &CARE_PLAN,
        ResourceType::Condition => &CONDITION,
        ResourceType::Coverage => &COVERAGE,
        ResourceType::DiagnosticReport => &DIAGNOSTIC_REPORT,
        ResourceType::DocumentReference => &DOCUMENT_REFERENCE,
        ResourceType::Encounter => &ENCOUNTER,
        ResourceType::Goal => &GOAL,
        ResourceType::Immunization => &IMMUNIZATION,
        ResourceType::Location => &LOCATION,
        ResourceType::Medication => &MEDICATION,
        ResourceType::MedicationRequest => &MEDICATION_REQUEST,
        ResourceType::Observation => &OBSERVATION,
        ResourceType::Organization => &ORGANIZATION,
        ResourceType::Patient => &PATIENT,
        ResourceType::Practitioner => &PRACTITIONER,
        ResourceType::PractitionerRole => &PRACTITIONER_ROLE,
        ResourceType::Procedure => &PROCEDURE,
        ResourceType::RequestGroup => &REQUEST_GROUP,
        ResourceType::ServiceRequest => &SERVICE_REQUEST,
    }
}

/// Every catalog entry, alphabetically
pub fn all() -> impl Iterator<Item = &'static ResourceSpec> {
    ResourceType::ALL.into_iter().map(spec)
}

/// Looks up a catalog entry by resource type name, ignoring ASCII case
pub fn find(name: &str) -> Option<&'static ResourceSpec> {
    all().find(|s| s.name().eq_ignore_ascii_case(name.trim()))
}
