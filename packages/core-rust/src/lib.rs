//! Resident Core — response envelope, service errors, and API contract ids
//! shared between the proxy server and its downstream client.

pub mod api;
pub mod envelope;
pub mod error;

pub use envelope::ResponseEnvelope;
pub use error::{MasterdataError, ServiceError};
