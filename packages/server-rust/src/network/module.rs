//! Proxy server lifecycle with deferred startup.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves. The
//! split lets callers (and tests) learn the bound port before traffic flows.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::ProxyConfig;
use super::handlers::{
    health_handler, liveness_handler, masterdata, readiness_handler, AppState,
};
use super::middleware::build_http_layers;
use super::shutdown::ShutdownController;
use crate::audit::AuditLogger;
use crate::traits::MasterdataService;

/// How long `serve` waits for in-flight dispatches after shutdown fires.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Manages the proxy server lifecycle.
///
/// The downstream service is injected at construction; nothing inside the
/// module looks collaborators up ambiently.
pub struct ProxyModule {
    config: ProxyConfig,
    listener: Option<TcpListener>,
    state: AppState,
}

impl ProxyModule {
    /// Creates the module without binding any port.
    ///
    /// # Errors
    ///
    /// Returns an error if the audit logger cannot be constructed from the
    /// configuration.
    pub fn new(
        config: ProxyConfig,
        masterdata: Arc<dyn MasterdataService>,
    ) -> anyhow::Result<Self> {
        let state = AppState {
            masterdata,
            audit: Arc::new(AuditLogger::new(&config.audit)?),
            shutdown: Arc::new(ShutdownController::new()),
            config: Arc::new(config.clone()),
            start_time: Instant::now(),
        };
        Ok(Self {
            config,
            listener: None,
            state,
        })
    }

    /// Shared shutdown controller, for callers that trigger drain externally.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.state.shutdown)
    }

    /// Assembles the axum router: one GET route per proxied operation plus
    /// the health endpoints, all behind the transport middleware stack.
    #[must_use]
    pub fn build_router(&self) -> Router {
        let layers = build_http_layers(&self.config.network);

        Router::new()
            .route(
                "/proxy/masterdata/validdocuments/{langCode}",
                get(masterdata::valid_documents),
            )
            .route(
                "/proxy/masterdata/locationHierarchyLevels/{langCode}",
                get(masterdata::location_hierarchy_levels_by_lang),
            )
            .route(
                "/proxy/masterdata/locationHierarchyLevels",
                get(masterdata::location_hierarchy_levels),
            )
            .route(
                "/proxy/masterdata/locations/immediatechildren/{locCode}/{langCode}",
                get(masterdata::immediate_children),
            )
            .route(
                "/auth-proxy/masterdata/locations/immediatechildren/{locCode}",
                get(masterdata::immediate_children_multi_lang),
            )
            .route(
                "/proxy/masterdata/locations/info/{locCode}/{langCode}",
                get(masterdata::location_details),
            )
            .route(
                "/proxy/masterdata/getcoordinatespecificregistrationcenters/{langCode}/{lat}/{lon}/{radius}",
                get(masterdata::coordinate_specific_registration_centers),
            )
            .route(
                "/proxy/masterdata/applicanttype/{applicantId}/languages",
                get(masterdata::applicant_valid_documents),
            )
            .route(
                "/proxy/masterdata/registrationcenters/{langCode}/{hierarchyLevel}/names",
                get(masterdata::registration_centers_by_hierarchy_level),
            )
            .route(
                "/proxy/masterdata/registrationcenters/page/{langCode}/{hierarchyLevel}/{name}",
                get(masterdata::registration_centers_paginated),
            )
            .route(
                "/proxy/masterdata/workingdays/{centerId}/{langCode}",
                get(masterdata::registration_center_working_days),
            )
            .route(
                "/proxy/masterdata/idschema/latest",
                get(masterdata::latest_id_schema),
            )
            .route(
                "/auth-proxy/masterdata/templates/{langCode}/{templateTypeCode}",
                get(masterdata::templates_by_lang_and_type),
            )
            .route(
                "/auth-proxy/masterdata/dynamicfields/gender/{langCode}",
                get(masterdata::gender_dynamic_field),
            )
            .route(
                "/proxy/masterdata/dynamicfields/all/{fieldName}",
                get(masterdata::all_dynamic_fields_by_name),
            )
            .route(
                "/proxy/masterdata/documenttypes/{docCategoryCode}/{langCode}",
                get(masterdata::document_types_by_category_and_lang),
            )
            .route(
                "/proxy/masterdata/gendercode/{genderType}/{langCode}",
                get(masterdata::gender_code),
            )
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .layer(layers)
            .with_state(self.state.clone())
    }

    /// Binds the TCP listener.
    ///
    /// Returns the actual bound port, which differs from the configured one
    /// when port 0 (OS-assigned) is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.network.host, self.config.network.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("listener bound to {}:{}", self.config.network.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then drains.
    ///
    /// # Errors
    ///
    /// Returns an error on a fatal I/O failure of the underlying server.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called first.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let shutdown_ctrl = Arc::clone(&self.state.shutdown);
        let router = self.build_router();
        let listener = self
            .listener
            .expect("start() must be called before serve()");

        shutdown_ctrl.set_ready();
        info!("resident masterdata proxy serving requests");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        shutdown_ctrl.trigger_shutdown();
        if shutdown_ctrl.wait_for_drain(DRAIN_TIMEOUT).await {
            info!("all in-flight dispatches drained");
        } else {
            warn!("drain timeout expired with dispatches still in flight");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::network::handlers::masterdata::testing::StubMasterdata;

    fn module() -> ProxyModule {
        let stub = Arc::new(StubMasterdata::succeeding(json!({})));
        ProxyModule::new(ProxyConfig::default(), stub).unwrap()
    }

    #[test]
    fn new_does_not_bind() {
        assert!(module().listener.is_none());
    }

    #[test]
    fn build_router_creates_router() {
        let _router = module().build_router();
    }

    #[tokio::test]
    async fn start_binds_an_os_assigned_port() {
        let mut m = module();
        let port = m.start().await.expect("bind should succeed");
        assert!(port > 0);
        assert!(m.listener.is_some());
    }

    #[tokio::test]
    #[should_panic(expected = "start() must be called before serve()")]
    async fn serve_panics_without_start() {
        let _ = module().serve(std::future::pending::<()>()).await;
    }
}
