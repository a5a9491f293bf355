use async_trait::async_trait;
use serde_json::Value;

use resident_core::MasterdataError;

/// The downstream masterdata interface, one method per proxied operation.
///
/// Payloads are opaque pass-through JSON: the proxy never interprets what a
/// downstream operation returns, it only wraps it. Implementations:
/// HTTP client against the masterdata service (production), scripted stubs
/// (tests).
///
/// Recognized business failures come back as `MasterdataError::Service` /
/// `Unavailable`; anything else is `Internal` and escapes the dispatch layer.
#[async_trait]
pub trait MasterdataService: Send + Sync {
    /// Valid document categories/types for a language.
    async fn valid_documents(&self, lang_code: &str) -> Result<Value, MasterdataError>;

    /// Location hierarchy levels localized to one language.
    async fn location_hierarchy_levels_by_lang(
        &self,
        lang_code: &str,
    ) -> Result<Value, MasterdataError>;

    /// Location hierarchy levels across all languages.
    async fn location_hierarchy_levels(&self) -> Result<Value, MasterdataError>;

    /// Immediate child locations of a location, one language.
    async fn immediate_children(
        &self,
        loc_code: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError>;

    /// Immediate child locations of a location across several languages.
    async fn immediate_children_multi_lang(
        &self,
        loc_code: &str,
        language_codes: &[String],
    ) -> Result<Value, MasterdataError>;

    /// Detail record for a single location.
    async fn location_details(
        &self,
        loc_code: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError>;

    /// Registration centers within `proximity_distance` of a coordinate.
    async fn coordinate_specific_registration_centers(
        &self,
        lang_code: &str,
        longitude: f64,
        latitude: f64,
        proximity_distance: i32,
    ) -> Result<Value, MasterdataError>;

    /// Valid documents for an applicant type, per requested language.
    async fn applicant_valid_documents(
        &self,
        applicant_id: &str,
        languages: &[String],
    ) -> Result<Value, MasterdataError>;

    /// Registration centers at a hierarchy level matching any of `names`.
    async fn registration_centers_by_hierarchy_level(
        &self,
        lang_code: &str,
        hierarchy_level: i16,
        names: &[String],
    ) -> Result<Value, MasterdataError>;

    /// Paginated registration-center text search at a hierarchy level.
    #[allow(clippy::too_many_arguments)]
    async fn registration_centers_paginated(
        &self,
        lang_code: &str,
        hierarchy_level: i16,
        name: &str,
        page_number: i32,
        page_size: i32,
        order_by: &str,
        sort_by: &str,
    ) -> Result<Value, MasterdataError>;

    /// Working days of a registration center.
    async fn registration_center_working_days(
        &self,
        center_id: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError>;

    /// Latest identity schema, optionally filtered by domain and type.
    /// `schema_version` of `0.0` means "latest".
    async fn latest_id_schema(
        &self,
        schema_version: f64,
        domain: Option<&str>,
        schema_type: Option<&str>,
    ) -> Result<Value, MasterdataError>;

    /// Notification/acknowledgement templates for a language and type.
    async fn templates_by_lang_and_type(
        &self,
        lang_code: &str,
        template_type_code: &str,
    ) -> Result<Value, MasterdataError>;

    /// A dynamic field by name and language; `with_value` includes the
    /// field's value list in the payload.
    async fn dynamic_field_by_name_and_lang(
        &self,
        field_name: &str,
        lang_code: &str,
        with_value: bool,
    ) -> Result<Value, MasterdataError>;

    /// All localizations of a dynamic field.
    async fn all_dynamic_fields_by_name(
        &self,
        field_name: &str,
    ) -> Result<Value, MasterdataError>;

    /// Document types under a document category, one language.
    async fn document_types_by_category_and_lang(
        &self,
        doc_category_code: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError>;

    /// Gender code for a gender type name, one language.
    async fn gender_code(
        &self,
        gender_type: &str,
        lang_code: &str,
    ) -> Result<Value, MasterdataError>;
}
