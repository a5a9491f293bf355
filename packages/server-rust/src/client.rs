//! HTTP implementation of the downstream masterdata interface.
//!
//! The downstream service answers with the same envelope shape the proxy
//! emits. A reply with a non-empty `errors` list is a recognized business
//! failure; transport problems (connect errors, timeouts, non-2xx statuses,
//! undecodable bodies) are recognized as resource-unavailable. No retries
//! happen here.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use resident_core::{MasterdataError, ResponseEnvelope};

use crate::network::config::DownstreamConfig;
use crate::traits::MasterdataService;

/// Downstream masterdata client over reqwest.
pub struct HttpMasterdataClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpMasterdataClient {
    /// Builds a client from downstream configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &DownstreamConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issues one GET against the downstream and unwraps its envelope.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, MasterdataError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "downstream call");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| MasterdataError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MasterdataError::Unavailable(format!(
                "{path} answered {status}"
            )));
        }

        let envelope: ResponseEnvelope<Value> = response
            .json()
            .await
            .map_err(|err| MasterdataError::Unavailable(format!("undecodable reply: {err}")))?;
        unwrap_reply(envelope)
    }
}

/// Classifies a downstream envelope into payload or failure.
fn unwrap_reply(envelope: ResponseEnvelope<Value>) -> Result<Value, MasterdataError> {
    if !envelope.errors.is_empty() {
        return Err(MasterdataError::Service(envelope.errors));
    }
    envelope.response.ok_or_else(|| {
        MasterdataError::Unavailable("reply carried neither payload nor errors".to_string())
    })
}

#[async_trait]
impl MasterdataService for HttpMasterdataClient {
    async fn valid_documents(&self, lang_code: &str) -> Result<Value, MasterdataError> {
        self.get(&format!("validdocuments/{lang_code}"), &[]).await
    }

    async fn location_hierarchy_levels_by_lang(
        &self,
        lang_code: &str,
    ) -> Result<Value, MasterdataError> {
        self.get(&format!("locationHierarchyLevels/{lang_code}"), &[])
            .await
    }

    async fn location_hierarchy_levels(&self) -> Result<Value, MasterdataError> {
        self.get("locationHierarchyLevels", &[]).await
    }

    async fn immediate_children(
        &self,
        loc_code: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError> {
        self.get(
            &format!("locations/immediatechildren/{loc_code}/{lang_code}"),
            &[],
        )
        .await
    }

    async fn immediate_children_multi_lang(
        &self,
        loc_code: &str,
        language_codes: &[String],
    ) -> Result<Value, MasterdataError> {
        self.get(
            &format!("locations/immediatechildren/{loc_code}"),
            &[("languageCodes", language_codes.join(","))],
        )
        .await
    }

    async fn location_details(
        &self,
        loc_code: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError> {
        self.get(&format!("locations/info/{loc_code}/{lang_code}"), &[])
            .await
    }

    async fn coordinate_specific_registration_centers(
        &self,
        lang_code: &str,
        longitude: f64,
        latitude: f64,
        proximity_distance: i32,
    ) -> Result<Value, MasterdataError> {
        self.get(
            &format!(
                "getcoordinatespecificregistrationcenters/{lang_code}/{longitude}/{latitude}/{proximity_distance}"
            ),
            &[],
        )
        .await
    }

    async fn applicant_valid_documents(
        &self,
        applicant_id: &str,
        languages: &[String],
    ) -> Result<Value, MasterdataError> {
        self.get(
            &format!("applicanttype/{applicant_id}/languages"),
            &[("languages", languages.join(","))],
        )
        .await
    }

    async fn registration_centers_by_hierarchy_level(
        &self,
        lang_code: &str,
        hierarchy_level: i16,
        names: &[String],
    ) -> Result<Value, MasterdataError> {
        self.get(
            &format!("registrationcenters/{lang_code}/{hierarchy_level}/names"),
            &[("name", names.join(","))],
        )
        .await
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
        self.get(
            &format!("registrationcenters/page/{lang_code}/{hierarchy_level}/{name}"),
            &[
                ("pageNumber", page_number.to_string()),
                ("pageSize", page_size.to_string()),
                ("orderBy", order_by.to_string()),
                ("sortBy", sort_by.to_string()),
            ],
        )
        .await
    }

    async fn registration_center_working_days(
        &self,
        center_id: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError> {
        self.get(&format!("workingdays/{center_id}/{lang_code}"), &[])
            .await
    }

    async fn latest_id_schema(
        &self,
        schema_version: f64,
        domain: Option<&str>,
        schema_type: Option<&str>,
    ) -> Result<Value, MasterdataError> {
        let mut query = vec![("schemaVersion", schema_version.to_string())];
        if let Some(domain) = domain {
            query.push(("domain", domain.to_string()));
        }
        if let Some(schema_type) = schema_type {
            query.push(("type", schema_type.to_string()));
        }
        self.get("idschema/latest", &query).await
    }

    async fn templates_by_lang_and_type(
        &self,
        lang_code: &str,
        template_type_code: &str,
    ) -> Result<Value, MasterdataError> {
        self.get(&format!("templates/{lang_code}/{template_type_code}"), &[])
            .await
    }

    async fn dynamic_field_by_name_and_lang(
        &self,
        field_name: &str,
        lang_code: &str,
        with_value: bool,
    ) -> Result<Value, MasterdataError> {
        self.get(
            &format!("dynamicfields/{field_name}/{lang_code}"),
            &[("withValue", with_value.to_string())],
        )
        .await
    }

    async fn all_dynamic_fields_by_name(
        &self,
        field_name: &str,
    ) -> Result<Value, MasterdataError> {
        self.get(&format!("dynamicfields/all/{field_name}"), &[]).await
    }

    async fn document_types_by_category_and_lang(
        &self,
        doc_category_code: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError> {
        self.get(
            &format!("documenttypes/{doc_category_code}/{lang_code}"),
            &[],
        )
        .await
    }

    async fn gender_code(
        &self,
        gender_type: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError> {
        self.get(&format!("gendercode/{gender_type}/{lang_code}"), &[])
            .await
    }
}
