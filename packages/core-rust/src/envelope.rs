//! The uniform response envelope returned by every proxied endpoint.
//!
//! Wire field names (`id`, `version`, `responsetime`, `response`, `errors`)
//! match what existing resident-facing clients parse, so they must not be
//! renamed. The same struct decodes downstream replies, which use the same
//! envelope shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Success/error wrapper for a single proxied response.
///
/// Invariant: exactly one of `response` / non-empty `errors` is populated.
/// The only constructors are [`ResponseEnvelope::success`] and
/// [`ResponseEnvelope::failure`], which enforce it; an envelope is never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    /// API contract identifier, fixed per endpoint family.
    pub id: String,
    /// Contract version, e.g. `"v1"`.
    pub version: String,
    /// Construction time of this envelope.
    pub responsetime: DateTime<Utc>,
    /// Payload; present on success, `null` on failure.
    #[serde(default)]
    pub response: Option<T>,
    /// Ordered error list; empty on success.
    #[serde(default)]
    pub errors: Vec<ServiceError>,
}

impl<T> ResponseEnvelope<T> {
    /// Builds a success envelope carrying `payload` and no errors.
    pub fn success(id: &str, version: &str, payload: T) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            responsetime: Utc::now(),
            response: Some(payload),
            errors: Vec::new(),
        }
    }

    /// Builds a failure envelope with a `null` payload.
    ///
    /// An empty `errors` list would break the envelope invariant, so it is
    /// replaced with the generic unknown-error entry.
    pub fn failure(id: &str, version: &str, errors: Vec<ServiceError>) -> Self {
        let errors = if errors.is_empty() {
            vec![ServiceError::unknown()]
        } else {
            errors
        };
        Self {
            id: id.to_string(),
            version: version.to_string(),
            responsetime: Utc::now(),
            response: None,
            errors,
        }
    }

    /// Whether this envelope carries a payload rather than errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response.is_some() && self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn success_has_payload_and_no_errors() {
        let env = ResponseEnvelope::success("id.family", "v1", json!({"code": "MLE"}));
        assert!(env.is_success());
        assert_eq!(env.response, Some(json!({"code": "MLE"})));
        assert!(env.errors.is_empty());
    }

    #[test]
    fn failure_has_null_payload_and_errors() {
        let env: ResponseEnvelope<Value> = ResponseEnvelope::failure(
            "id.family",
            "v1",
            vec![ServiceError::new("RES-SER-001", "not found")],
        );
        assert!(!env.is_success());
        assert!(env.response.is_none());
        assert_eq!(env.errors.len(), 1);
    }

    #[test]
    fn failure_with_no_errors_falls_back_to_unknown() {
        // Invariant: never neither payload nor errors.
        let env: ResponseEnvelope<Value> = ResponseEnvelope::failure("id", "v1", Vec::new());
        assert_eq!(env.errors.len(), 1);
        assert_eq!(env.errors[0].error_code, crate::error::codes::UNKNOWN_ERROR);
    }

    #[test]
    fn wire_field_names_are_stable() {
        let env = ResponseEnvelope::success("id.family", "v1", json!([1, 2]));
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["id"], "id.family");
        assert_eq!(json["version"], "v1");
        assert!(json.get("responsetime").is_some());
        assert_eq!(json["response"], json!([1, 2]));
        assert_eq!(json["errors"], json!([]));
    }

    #[test]
    fn failure_serializes_null_response() {
        let env: ResponseEnvelope<Value> =
            ResponseEnvelope::failure("id", "v1", vec![ServiceError::unknown()]);
        let json = serde_json::to_value(&env).unwrap();
        assert!(json["response"].is_null());
        assert_eq!(json["errors"][0]["errorCode"], "RES-SER-500");
    }

    #[test]
    fn decodes_downstream_reply_without_optional_fields() {
        // Downstream envelopes may omit `response` or `errors` entirely.
        let raw = r#"{"id": "x", "version": "v1", "responsetime": "2024-03-01T10:00:00.000Z"}"#;
        let env: ResponseEnvelope<Value> = serde_json::from_str(raw).unwrap();
        assert!(env.response.is_none());
        assert!(env.errors.is_empty());
    }

    #[test]
    fn decodes_downstream_error_reply() {
        let raw = r#"{
            "id": "x", "version": "v1",
            "responsetime": "2024-03-01T10:00:00.000Z",
            "response": null,
            "errors": [{"errorCode": "KER-MSD-001", "errorMessage": "lang not found"}]
        }"#;
        let env: ResponseEnvelope<Value> = serde_json::from_str(raw).unwrap();
        assert!(env.response.is_none());
        assert_eq!(env.errors[0].error_code, "KER-MSD-001");
    }
}
