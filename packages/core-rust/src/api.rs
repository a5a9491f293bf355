//! API contract identifiers and the envelope version constant.
//!
//! Every proxied endpoint family stamps its envelope with a fixed contract
//! id so callers can tell which contract a response belongs to without
//! inspecting the request they sent.

/// Envelope `version` value, constant per deployment.
pub const VERSION: &str = "v1";

/// Contract ids, one per proxied endpoint family.
pub mod contract_ids {
    pub const VALID_DOCUMENTS: &str = "mosip.resident.validdocument";
    pub const LOCATION_HIERARCHY_LEVELS: &str = "mosip.resident.locationhierarchylevels";
    pub const IMMEDIATE_CHILDREN: &str = "mosip.resident.locations.immediatechildren";
    pub const LOCATION_DETAILS: &str = "mosip.resident.locations.details";
    pub const COORDINATE_REGISTRATION_CENTERS: &str =
        "mosip.resident.coordinatespecificregistrationcenters";
    pub const APPLICANT_VALID_DOCUMENTS: &str = "mosip.resident.applicantvaliddocument";
    pub const REGISTRATION_CENTERS_BY_HIERARCHY: &str =
        "mosip.resident.registrationcenters.hierarchylevel";
    pub const REGISTRATION_CENTERS_PAGINATED: &str =
        "mosip.resident.registrationcenters.paginated";
    pub const WORKING_DAYS: &str = "mosip.resident.workingdays";
    pub const LATEST_ID_SCHEMA: &str = "mosip.resident.idschema.latest";
    pub const TEMPLATES: &str = "mosip.resident.templates";
    pub const DYNAMIC_FIELD: &str = "mosip.resident.dynamicfield";
    pub const ALL_DYNAMIC_FIELDS: &str = "mosip.resident.dynamicfields.all";
    pub const DOCUMENT_TYPES: &str = "mosip.resident.documenttypes";
    pub const GENDER_CODE: &str = "mosip.resident.gendercode";

    /// Fallback id for responses produced before a handler was reached
    /// (malformed requests) or by the global error handler.
    pub const PROXY_ERROR: &str = "mosip.resident.proxy.error";
}
