//! Fire-and-forget audit records, one per dispatched request.
//!
//! The audit write happens off the request path: it is spawned, never
//! awaited, never retried, and its failure must not fail the request.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::network::config::AuditConfig;

/// Audited proxy event, one variant per endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent {
    GetValidDocuments,
    GetLocationHierarchyLevels,
    GetImmediateChildren,
    GetLocationDetails,
    GetCoordinateSpecificRegistrationCenters,
    GetApplicantValidDocuments,
    GetRegistrationCenters,
    GetRegistrationCentersPaginated,
    GetWorkingDays,
    GetLatestIdSchema,
    GetTemplates,
    GetDynamicField,
    GetAllDynamicFields,
    GetDocumentTypes,
    GetGenderCode,
}

impl AuditEvent {
    /// Event name written into the audit record.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetValidDocuments => "GET_VALID_DOCUMENTS",
            Self::GetLocationHierarchyLevels => "GET_LOCATION_HIERARCHY_LEVELS",
            Self::GetImmediateChildren => "GET_IMMEDIATE_CHILDREN",
            Self::GetLocationDetails => "GET_LOCATION_DETAILS",
            Self::GetCoordinateSpecificRegistrationCenters => {
                "GET_COORDINATE_SPECIFIC_REGISTRATION_CENTERS"
            }
            Self::GetApplicantValidDocuments => "GET_APPLICANT_VALID_DOCUMENTS",
            Self::GetRegistrationCenters => "GET_REGISTRATION_CENTERS",
            Self::GetRegistrationCentersPaginated => "GET_REGISTRATION_CENTERS_PAGINATED",
            Self::GetWorkingDays => "GET_WORKING_DAYS",
            Self::GetLatestIdSchema => "GET_LATEST_ID_SCHEMA",
            Self::GetTemplates => "GET_TEMPLATES",
            Self::GetDynamicField => "GET_DYNAMIC_FIELD",
            Self::GetAllDynamicFields => "GET_ALL_DYNAMIC_FIELDS",
            Self::GetDocumentTypes => "GET_DOCUMENT_TYPES",
            Self::GetGenderCode => "GET_GENDER_CODE",
        }
    }
}

/// One audit record as posted to the audit sink.
#[derive(Debug, Serialize)]
struct AuditRecord {
    event_id: Uuid,
    event_name: &'static str,
    /// RFC 3339 timestamp of the dispatch, not of the sink write.
    action_timestamp: chrono::DateTime<Utc>,
    application_name: &'static str,
}

/// Writes audit records for dispatched requests.
///
/// With a configured endpoint, records are POSTed to the remote audit sink
/// from a spawned task. Without one, records only surface as `debug` events
/// in the trace log, which is what tests and local runs use.
pub struct AuditLogger {
    endpoint: Option<String>,
    http: reqwest::Client,
}

impl AuditLogger {
    /// Creates a logger from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &AuditConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            http,
        })
    }

    /// Logger without a remote sink; records go to the trace log only.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            endpoint: None,
            http: reqwest::Client::new(),
        }
    }

    /// Records one event, fire-and-forget.
    ///
    /// Returns immediately; the remote write (if any) runs in a spawned
    /// task. A failed write is logged at `warn` and otherwise dropped.
    pub fn record(self: &Arc<Self>, event: AuditEvent) {
        let record = AuditRecord {
            event_id: Uuid::new_v4(),
            event_name: event.as_str(),
            action_timestamp: Utc::now(),
            application_name: "resident-masterdata-proxy",
        };
        debug!(event = record.event_name, event_id = %record.event_id, "audit");

        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };
        let logger = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(err) = logger.http.post(&endpoint).json(&record).send().await {
                warn!(event = record.event_name, %err, "audit write failed");
            }
        });
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Default timeout for remote audit writes.
pub(crate) const DEFAULT_AUDIT_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_are_unique() {
        let events = [
            AuditEvent::GetValidDocuments,
            AuditEvent::GetLocationHierarchyLevels,
            AuditEvent::GetImmediateChildren,
            AuditEvent::GetLocationDetails,
            AuditEvent::GetCoordinateSpecificRegistrationCenters,
            AuditEvent::GetApplicantValidDocuments,
            AuditEvent::GetRegistrationCenters,
            AuditEvent::GetRegistrationCentersPaginated,
            AuditEvent::GetWorkingDays,
            AuditEvent::GetLatestIdSchema,
            AuditEvent::GetTemplates,
            AuditEvent::GetDynamicField,
            AuditEvent::GetAllDynamicFields,
            AuditEvent::GetDocumentTypes,
            AuditEvent::GetGenderCode,
        ];
        let mut names: Vec<_> = events.iter().map(|e| e.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), events.len());
    }

    #[tokio::test]
    async fn record_without_endpoint_does_not_panic() {
        let logger = Arc::new(AuditLogger::disabled());
        logger.record(AuditEvent::GetGenderCode);
    }

    #[tokio::test]
    async fn record_with_unreachable_endpoint_does_not_fail_caller() {
        // The spawned write will fail; the caller must not observe it.
        let logger = Arc::new(
            AuditLogger::new(&AuditConfig {
                endpoint: Some("http://127.0.0.1:1/audit".to_string()),
                request_timeout: Duration::from_millis(100),
            })
            .unwrap(),
        );
        logger.record(AuditEvent::GetValidDocuments);
        // Give the spawned task a chance to run and fail quietly.
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
