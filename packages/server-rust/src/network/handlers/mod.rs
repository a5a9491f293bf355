//! HTTP handler definitions for the resident masterdata proxy.
//!
//! Defines `AppState` (shared state carried through axum extractors) and
//! re-exports the handler functions used when assembling the router.

pub mod health;
pub mod masterdata;

pub use health::{health_handler, liveness_handler, readiness_handler};

use std::sync::Arc;
use std::time::Instant;

use crate::audit::AuditLogger;
use crate::network::config::ProxyConfig;
use crate::network::shutdown::ShutdownController;
use crate::traits::MasterdataService;

/// Shared application state passed to all axum handlers via `State`.
///
/// The downstream service is an explicitly injected trait object: the
/// dispatch layer never looks it up ambiently, so tests swap in a stub by
/// constructing a different state.
#[derive(Clone)]
pub struct AppState {
    /// Downstream masterdata interface.
    pub masterdata: Arc<dyn MasterdataService>,
    /// Fire-and-forget audit sink.
    pub audit: Arc<AuditLogger>,
    /// Graceful shutdown controller with in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Proxy configuration (envelope version, timeouts).
    pub config: Arc<ProxyConfig>,
    /// Server process start time, used for uptime reporting.
    pub start_time: Instant,
}
