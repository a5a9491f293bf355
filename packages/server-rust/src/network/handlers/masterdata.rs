//! Route handlers for the proxied masterdata operations.
//!
//! Every handler follows the same shape: extract and coerce parameters,
//! record one audit event, invoke exactly one downstream operation, and
//! wrap the outcome in a response envelope. Recognized downstream failures
//! become envelope errors with HTTP 200 -- the envelope, not the status,
//! carries the failure signal (a compatibility contract with existing
//! callers). Only malformed parameters (400) and unrecognized faults (500)
//! surface as non-200.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::Json;
use metrics::counter;
use serde_json::Value;

use resident_core::api::contract_ids;
use resident_core::{MasterdataError, ResponseEnvelope};

use super::AppState;
use crate::audit::AuditEvent;
use crate::network::error::ProxyError;
use crate::network::shutdown::InFlightGuard;

type Envelope = ResponseEnvelope<Value>;
type HandlerResult = Result<Json<Envelope>, ProxyError>;

// ---------------------------------------------------------------------------
// Dispatch helpers
// ---------------------------------------------------------------------------

/// Marks the start of one dispatch: one audit record, one in-flight slot.
fn begin(state: &AppState, event: AuditEvent) -> InFlightGuard {
    state.audit.record(event);
    state.shutdown.in_flight_guard()
}

/// Folds a downstream result into the envelope contract.
///
/// Recognized failures answer 200 with envelope errors; `Internal` escapes
/// to the fallback handler as a `ProxyError`.
fn respond(
    state: &AppState,
    contract_id: &'static str,
    result: Result<Value, MasterdataError>,
) -> HandlerResult {
    let version = &state.config.api_version;
    match result {
        Ok(payload) => {
            counter!("proxy_requests_total", "contract" => contract_id, "outcome" => "success")
                .increment(1);
            Ok(Json(Envelope::success(contract_id, version, payload)))
        }
        Err(MasterdataError::Internal(err)) => {
            counter!("proxy_requests_total", "contract" => contract_id, "outcome" => "escalated")
                .increment(1);
            Err(ProxyError::Internal(err))
        }
        Err(recognized) => {
            counter!("proxy_requests_total", "contract" => contract_id, "outcome" => "error_envelope")
                .increment(1);
            let errors = recognized.into_errors().unwrap_or_default();
            Ok(Json(Envelope::failure(contract_id, version, errors)))
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter coercion
// ---------------------------------------------------------------------------

/// Coerces a raw string parameter, turning a parse failure into a client
/// input error (400) rather than a routing-level rejection.
fn parse_param<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ProxyError> {
    raw.trim().parse().map_err(|_| ProxyError::InvalidInput {
        name,
        value: raw.to_string(),
    })
}

/// Case-insensitive boolean; anything other than true/false is a client
/// input error instead of a silent false.
fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ProxyError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ProxyError::InvalidInput {
            name,
            value: raw.to_string(),
        })
    }
}

/// Query value, falling back to `default` when the key is missing or the
/// value is empty (the original binding treated both the same way).
fn query_or<'a>(params: &'a HashMap<String, String>, key: &str, default: &'a str) -> &'a str {
    match params.get(key) {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

/// Optional query value; missing and empty are both absent.
fn query_opt<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Splits a comma-separated query value into an ordered list.
/// `?languages=eng` yields `["eng"]`, never a bare string.
fn csv_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Handlers, one per proxied route
// ---------------------------------------------------------------------------

/// `GET /proxy/masterdata/validdocuments/{langCode}`
pub async fn valid_documents(
    State(state): State<AppState>,
    Path(lang_code): Path<String>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetValidDocuments);
    let result = state.masterdata.valid_documents(&lang_code).await;
    respond(&state, contract_ids::VALID_DOCUMENTS, result)
}

/// `GET /proxy/masterdata/locationHierarchyLevels/{langCode}`
pub async fn location_hierarchy_levels_by_lang(
    State(state): State<AppState>,
    Path(lang_code): Path<String>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetLocationHierarchyLevels);
    let result = state
        .masterdata
        .location_hierarchy_levels_by_lang(&lang_code)
        .await;
    respond(&state, contract_ids::LOCATION_HIERARCHY_LEVELS, result)
}

/// `GET /proxy/masterdata/locationHierarchyLevels`
pub async fn location_hierarchy_levels(State(state): State<AppState>) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetLocationHierarchyLevels);
    let result = state.masterdata.location_hierarchy_levels().await;
    respond(&state, contract_ids::LOCATION_HIERARCHY_LEVELS, result)
}

/// `GET /proxy/masterdata/locations/immediatechildren/{locCode}/{langCode}`
pub async fn immediate_children(
    State(state): State<AppState>,
    Path((loc_code, lang_code)): Path<(String, String)>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetImmediateChildren);
    let result = state
        .masterdata
        .immediate_children(&loc_code, &lang_code)
        .await;
    respond(&state, contract_ids::IMMEDIATE_CHILDREN, result)
}

/// `GET /auth-proxy/masterdata/locations/immediatechildren/{locCode}?languageCodes=`
pub async fn immediate_children_multi_lang(
    State(state): State<AppState>,
    Path(loc_code): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetImmediateChildren);
    let language_codes = csv_list(query_opt(&params, "languageCodes"));
    let result = state
        .masterdata
        .immediate_children_multi_lang(&loc_code, &language_codes)
        .await;
    respond(&state, contract_ids::IMMEDIATE_CHILDREN, result)
}

/// `GET /proxy/masterdata/locations/info/{locCode}/{langCode}`
pub async fn location_details(
    State(state): State<AppState>,
    Path((loc_code, lang_code)): Path<(String, String)>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetLocationDetails);
    let result = state
        .masterdata
        .location_details(&loc_code, &lang_code)
        .await;
    respond(&state, contract_ids::LOCATION_DETAILS, result)
}

/// `GET /proxy/masterdata/getcoordinatespecificregistrationcenters/{langCode}/{lat}/{lon}/{radius}`
pub async fn coordinate_specific_registration_centers(
    State(state): State<AppState>,
    Path((lang_code, lat, lon, radius)): Path<(String, String, String, String)>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetCoordinateSpecificRegistrationCenters);
    let latitude: f64 = parse_param("lat", &lat)?;
    let longitude: f64 = parse_param("lon", &lon)?;
    let proximity_distance: i32 = parse_param("radius", &radius)?;
    let result = state
        .masterdata
        .coordinate_specific_registration_centers(
            &lang_code,
            longitude,
            latitude,
            proximity_distance,
        )
        .await;
    respond(&state, contract_ids::COORDINATE_REGISTRATION_CENTERS, result)
}

/// `GET /proxy/masterdata/applicanttype/{applicantId}/languages?languages=`
pub async fn applicant_valid_documents(
    State(state): State<AppState>,
    Path(applicant_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetApplicantValidDocuments);
    let languages = csv_list(query_opt(&params, "languages"));
    let result = state
        .masterdata
        .applicant_valid_documents(&applicant_id, &languages)
        .await;
    respond(&state, contract_ids::APPLICANT_VALID_DOCUMENTS, result)
}

/// `GET /proxy/masterdata/registrationcenters/{langCode}/{hierarchyLevel}/names?name=`
pub async fn registration_centers_by_hierarchy_level(
    State(state): State<AppState>,
    Path((lang_code, hierarchy_level)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetRegistrationCenters);
    let hierarchy_level: i16 = parse_param("hierarchyLevel", &hierarchy_level)?;
    let names = csv_list(query_opt(&params, "name"));
    let result = state
        .masterdata
        .registration_centers_by_hierarchy_level(&lang_code, hierarchy_level, &names)
        .await;
    respond(&state, contract_ids::REGISTRATION_CENTERS_BY_HIERARCHY, result)
}

/// `GET /proxy/masterdata/registrationcenters/page/{langCode}/{hierarchyLevel}/{name}`
/// `?pageNumber=&pageSize=&orderBy=&sortBy=`
pub async fn registration_centers_paginated(
    State(state): State<AppState>,
    Path((lang_code, hierarchy_level, name)): Path<(String, String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetRegistrationCentersPaginated);
    let hierarchy_level: i16 = parse_param("hierarchyLevel", &hierarchy_level)?;
    let page_number: i32 = parse_param("pageNumber", query_or(&params, "pageNumber", "0"))?;
    let page_size: i32 = parse_param("pageSize", query_or(&params, "pageSize", "10"))?;
    let order_by = query_or(&params, "orderBy", "desc");
    let sort_by = query_or(&params, "sortBy", "createdDateTime");
    let result = state
        .masterdata
        .registration_centers_paginated(
            &lang_code,
            hierarchy_level,
            &name,
            page_number,
            page_size,
            order_by,
            sort_by,
        )
        .await;
    respond(&state, contract_ids::REGISTRATION_CENTERS_PAGINATED, result)
}

/// `GET /proxy/masterdata/workingdays/{centerId}/{langCode}`
pub async fn registration_center_working_days(
    State(state): State<AppState>,
    Path((center_id, lang_code)): Path<(String, String)>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetWorkingDays);
    let result = state
        .masterdata
        .registration_center_working_days(&center_id, &lang_code)
        .await;
    respond(&state, contract_ids::WORKING_DAYS, result)
}

/// `GET /proxy/masterdata/idschema/latest?schemaVersion=&domain=&type=`
pub async fn latest_id_schema(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetLatestIdSchema);
    let schema_version: f64 =
        parse_param("schemaVersion", query_or(&params, "schemaVersion", "0"))?;
    let domain = query_opt(&params, "domain");
    let schema_type = query_opt(&params, "type");
    let result = state
        .masterdata
        .latest_id_schema(schema_version, domain, schema_type)
        .await;
    respond(&state, contract_ids::LATEST_ID_SCHEMA, result)
}

/// `GET /auth-proxy/masterdata/templates/{langCode}/{templateTypeCode}`
pub async fn templates_by_lang_and_type(
    State(state): State<AppState>,
    Path((lang_code, template_type_code)): Path<(String, String)>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetTemplates);
    let result = state
        .masterdata
        .templates_by_lang_and_type(&lang_code, &template_type_code)
        .await;
    respond(&state, contract_ids::TEMPLATES, result)
}

/// `GET /auth-proxy/masterdata/dynamicfields/gender/{langCode}?withValue=`
///
/// The field name is fixed to `"gender"`; only the language and the
/// `withValue` flag vary.
pub async fn gender_dynamic_field(
    State(state): State<AppState>,
    Path(lang_code): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetDynamicField);
    let with_value = parse_bool("withValue", query_or(&params, "withValue", "false"))?;
    let result = state
        .masterdata
        .dynamic_field_by_name_and_lang("gender", &lang_code, with_value)
        .await;
    respond(&state, contract_ids::DYNAMIC_FIELD, result)
}

/// `GET /proxy/masterdata/dynamicfields/all/{fieldName}`
pub async fn all_dynamic_fields_by_name(
    State(state): State<AppState>,
    Path(field_name): Path<String>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetAllDynamicFields);
    let result = state.masterdata.all_dynamic_fields_by_name(&field_name).await;
    respond(&state, contract_ids::ALL_DYNAMIC_FIELDS, result)
}

/// `GET /proxy/masterdata/documenttypes/{docCategoryCode}/{langCode}`
pub async fn document_types_by_category_and_lang(
    State(state): State<AppState>,
    Path((doc_category_code, lang_code)): Path<(String, String)>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetDocumentTypes);
    let result = state
        .masterdata
        .document_types_by_category_and_lang(&doc_category_code, &lang_code)
        .await;
    respond(&state, contract_ids::DOCUMENT_TYPES, result)
}

/// `GET /proxy/masterdata/gendercode/{genderType}/{langCode}`
pub async fn gender_code(
    State(state): State<AppState>,
    Path((gender_type, lang_code)): Path<(String, String)>,
) -> HandlerResult {
    let _guard = begin(&state, AuditEvent::GetGenderCode);
    let result = state.masterdata.gender_code(&gender_type, &lang_code).await;
    respond(&state, contract_ids::GENDER_CODE, result)
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use resident_core::{MasterdataError, ServiceError};

    use crate::audit::AuditLogger;
    use crate::network::config::ProxyConfig;
    use crate::network::handlers::AppState;
    use crate::network::shutdown::ShutdownController;
    use crate::traits::MasterdataService;

    /// What the stub downstream does on every call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StubScript {
        Succeed,
        FailService,
        FailUnavailable,
        FailInternal,
    }

    /// Scripted downstream that records each call as a descriptor string,
    /// so tests can assert coerced arguments passed through unchanged.
    pub struct StubMasterdata {
        pub payload: Value,
        pub script: StubScript,
        pub calls: Mutex<Vec<String>>,
    }

    impl StubMasterdata {
        pub fn succeeding(payload: Value) -> Self {
            Self {
                payload,
                script: StubScript::Succeed,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn scripted(script: StubScript) -> Self {
            Self {
                payload: json!({"ok": true}),
                script,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn recorded_calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self, descriptor: String) -> Result<Value, MasterdataError> {
            self.calls.lock().unwrap().push(descriptor);
            match self.script {
                StubScript::Succeed => Ok(self.payload.clone()),
                StubScript::FailService => Err(MasterdataError::Service(vec![
                    ServiceError::new("KER-MSD-999", "masterdata lookup failed"),
                ])),
                StubScript::FailUnavailable => {
                    Err(MasterdataError::Unavailable("connection refused".into()))
                }
                StubScript::FailInternal => {
                    Err(MasterdataError::Internal(anyhow::anyhow!("stub bug")))
                }
            }
        }
    }

    #[async_trait]
    impl MasterdataService for StubMasterdata {
        async fn valid_documents(&self, lang_code: &str) -> Result<Value, MasterdataError> {
            self.answer(format!("valid_documents lang={lang_code}"))
        }

        async fn location_hierarchy_levels_by_lang(
            &self,
            lang_code: &str,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!("location_hierarchy_levels_by_lang lang={lang_code}"))
        }

        async fn location_hierarchy_levels(&self) -> Result<Value, MasterdataError> {
            self.answer("location_hierarchy_levels".to_string())
        }

        async fn immediate_children(
            &self,
            loc_code: &str,
            lang_code: &str,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!("immediate_children loc={loc_code} lang={lang_code}"))
        }

        async fn immediate_children_multi_lang(
            &self,
            loc_code: &str,
            language_codes: &[String],
        ) -> Result<Value, MasterdataError> {
            self.answer(format!(
                "immediate_children_multi_lang loc={loc_code} langs={language_codes:?}"
            ))
        }

        async fn location_details(
            &self,
            loc_code: &str,
            lang_code: &str,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!("location_details loc={loc_code} lang={lang_code}"))
        }

        async fn coordinate_specific_registration_centers(
            &self,
            lang_code: &str,
            longitude: f64,
            latitude: f64,
            proximity_distance: i32,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!(
                "coordinate_centers lang={lang_code} lon={longitude} lat={latitude} radius={proximity_distance}"
            ))
        }

        async fn applicant_valid_documents(
            &self,
            applicant_id: &str,
            languages: &[String],
        ) -> Result<Value, MasterdataError> {
            self.answer(format!(
                "applicant_valid_documents id={applicant_id} langs={languages:?}"
            ))
        }

        async fn registration_centers_by_hierarchy_level(
            &self,
            lang_code: &str,
            hierarchy_level: i16,
            names: &[String],
        ) -> Result<Value, MasterdataError> {
            self.answer(format!(
                "registration_centers lang={lang_code} level={hierarchy_level} names={names:?}"
            ))
        }

        async fn registration_centers_paginated(
            &self,
            lang_code: &str,
            hierarchy_level: i16,
            name: &str,
            page_number: i32,
            page_size: i32,
            order_by: &str,
            sort_by: &str,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!(
                "registration_centers_paginated lang={lang_code} level={hierarchy_level} \
                 name={name} page={page_number} size={page_size} order={order_by} sort={sort_by}"
            ))
        }

        async fn registration_center_working_days(
            &self,
            center_id: &str,
            lang_code: &str,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!("working_days center={center_id} lang={lang_code}"))
        }

        async fn latest_id_schema(
            &self,
            schema_version: f64,
            domain: Option<&str>,
            schema_type: Option<&str>,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!(
                "latest_id_schema version={schema_version} domain={domain:?} type={schema_type:?}"
            ))
        }

        async fn templates_by_lang_and_type(
            &self,
            lang_code: &str,
            template_type_code: &str,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!(
                "templates lang={lang_code} type={template_type_code}"
            ))
        }

        async fn dynamic_field_by_name_and_lang(
            &self,
            field_name: &str,
            lang_code: &str,
            with_value: bool,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!(
                "dynamic_field field={field_name} lang={lang_code} with_value={with_value}"
            ))
        }

        async fn all_dynamic_fields_by_name(
            &self,
            field_name: &str,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!("all_dynamic_fields field={field_name}"))
        }

        async fn document_types_by_category_and_lang(
            &self,
            doc_category_code: &str,
            lang_code: &str,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!(
                "document_types category={doc_category_code} lang={lang_code}"
            ))
        }

        async fn gender_code(
            &self,
            gender_type: &str,
            lang_code: &str,
        ) -> Result<Value, MasterdataError> {
            self.answer(format!("gender_code type={gender_type} lang={lang_code}"))
        }
    }

    /// App state over a stub downstream; the stub is also returned so tests
    /// can inspect recorded calls.
    pub fn state_with(stub: StubMasterdata) -> (AppState, Arc<StubMasterdata>) {
        let stub = Arc::new(stub);
        let state = AppState {
            masterdata: Arc::clone(&stub) as Arc<dyn MasterdataService>,
            audit: Arc::new(AuditLogger::disabled()),
            shutdown: Arc::new(ShutdownController::new()),
            config: Arc::new(ProxyConfig::default()),
            start_time: Instant::now(),
        };
        (state, stub)
    }

    pub fn stub_state() -> AppState {
        state_with(StubMasterdata::succeeding(json!({"ok": true}))).0
    }
}
