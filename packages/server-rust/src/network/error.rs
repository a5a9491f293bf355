//! Proxy-level errors and their HTTP mapping.
//!
//! Recognized downstream failures never become a `ProxyError` — the
//! dispatch layer folds them into a 200 envelope. What is left is the
//! malformed-request case (400) and the global fallback for unrecognized
//! faults (500), both answered with a best-effort envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::error;

use resident_core::api::{self, contract_ids};
use resident_core::{ResponseEnvelope, ServiceError};

/// Errors raised by the dispatch layer itself.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// A path or query parameter could not be coerced to its declared type.
    #[error("invalid value {value:?} for parameter {name}")]
    InvalidInput { name: &'static str, value: String },

    /// Unrecognized fault escaping a downstream call.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::InvalidInput { name, .. } => {
                (StatusCode::BAD_REQUEST, ServiceError::invalid_input(name))
            }
            Self::Internal(err) => {
                error!(%err, "unrecognized failure reached the fallback handler");
                (StatusCode::INTERNAL_SERVER_ERROR, ServiceError::unknown())
            }
        };
        let envelope: ResponseEnvelope<Value> =
            ResponseEnvelope::failure(contract_ids::PROXY_ERROR, api::VERSION, vec![error]);
        (status, Json(envelope)).into_response()
    }
}
