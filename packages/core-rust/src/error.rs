//! Service error types shared across the proxy.
//!
//! The downstream masterdata interface reports business failures as data
//! (`ServiceError` values inside the envelope) rather than as a thrown
//! exception type, so call sites match on a `Result` instead of catching.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error codes
// ---------------------------------------------------------------------------

/// Well-known error codes carried in envelope `errors` entries.
pub mod codes {
    /// A path or query parameter failed validation or coercion.
    pub const INVALID_INPUT: &str = "RES-SER-410";
    /// The downstream masterdata resource could not be reached.
    pub const API_RESOURCE_UNAVAILABLE: &str = "RES-SER-409";
    /// Catch-all for faults the proxy does not recognize.
    pub const UNKNOWN_ERROR: &str = "RES-SER-500";
}

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// A single `(errorCode, errorMessage)` pair inside an envelope.
///
/// Wire field names are `errorCode` and `errorMessage`; existing callers
/// parse them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    #[serde(rename = "errorCode")]
    pub error_code: String,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

impl ServiceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: code.into(),
            error_message: message.into(),
        }
    }

    /// Client input error for the named parameter.
    #[must_use]
    pub fn invalid_input(parameter: &str) -> Self {
        Self::new(
            codes::INVALID_INPUT,
            format!("Invalid input parameter: {parameter}"),
        )
    }

    /// Downstream resource unreachable or replying with garbage.
    #[must_use]
    pub fn api_resource_unavailable(detail: &str) -> Self {
        Self::new(
            codes::API_RESOURCE_UNAVAILABLE,
            format!("API resource is not available: {detail}"),
        )
    }

    /// Fallback error for unrecognized faults.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(codes::UNKNOWN_ERROR, "Unknown error occurred")
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code, self.error_message)
    }
}

// ---------------------------------------------------------------------------
// MasterdataError
// ---------------------------------------------------------------------------

/// Failure of a downstream masterdata operation.
///
/// `Service` and `Unavailable` are *recognized* failures: the dispatch layer
/// folds them into the envelope `errors` list and still answers HTTP 200.
/// `Internal` is everything else and propagates to the global handler.
#[derive(Debug, thiserror::Error)]
pub enum MasterdataError {
    /// Business-level failure reported by the downstream envelope.
    #[error("downstream reported {} error(s)", .0.len())]
    Service(Vec<ServiceError>),

    /// Transport-level failure reaching the downstream service.
    #[error("downstream unavailable: {0}")]
    Unavailable(String),

    /// Unrecognized fault; not translated into envelope errors.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MasterdataError {
    /// Whether the dispatch layer translates this failure into envelope
    /// errors (HTTP 200) instead of letting it escape to the global handler.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }

    /// The envelope `errors` entries for a recognized failure.
    ///
    /// Returns `None` for `Internal`, which has no envelope representation
    /// at this layer.
    #[must_use]
    pub fn into_errors(self) -> Option<Vec<ServiceError>> {
        match self {
            Self::Service(errors) => Some(errors),
            Self::Unavailable(detail) => {
                Some(vec![ServiceError::api_resource_unavailable(&detail)])
            }
            Self::Internal(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_wire_field_names() {
        let err = ServiceError::new("RES-SER-001", "boom");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["errorCode"], "RES-SER-001");
        assert_eq!(json["errorMessage"], "boom");
    }

    #[test]
    fn invalid_input_names_the_parameter() {
        let err = ServiceError::invalid_input("hierarchyLevel");
        assert_eq!(err.error_code, codes::INVALID_INPUT);
        assert!(err.error_message.contains("hierarchyLevel"));
    }

    #[test]
    fn service_failure_is_recognized() {
        let err = MasterdataError::Service(vec![ServiceError::unknown()]);
        assert!(err.is_recognized());
        assert_eq!(err.into_errors().unwrap().len(), 1);
    }

    #[test]
    fn unavailable_maps_to_resource_code() {
        let err = MasterdataError::Unavailable("connection refused".into());
        assert!(err.is_recognized());
        let errors = err.into_errors().unwrap();
        assert_eq!(errors[0].error_code, codes::API_RESOURCE_UNAVAILABLE);
        assert!(errors[0].error_message.contains("connection refused"));
    }

    #[test]
    fn internal_is_not_recognized() {
        let err = MasterdataError::Internal(anyhow::anyhow!("bug"));
        assert!(!err.is_recognized());
        assert!(err.into_errors().is_none());
    }
}
