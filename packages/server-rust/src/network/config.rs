//! Configuration types for the resident masterdata proxy.

use std::time::Duration;

/// Top-level proxy configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Envelope `version` stamped on every response.
    pub api_version: String,
    /// HTTP listener settings.
    pub network: NetworkConfig,
    /// Downstream masterdata service settings.
    pub downstream: DownstreamConfig,
    /// Audit sink settings.
    pub audit: AuditConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_version: resident_core::api::VERSION.to_string(),
            network: NetworkConfig::default(),
            downstream: DownstreamConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Maximum time to wait for a request to complete.
    pub request_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Downstream masterdata service configuration.
///
/// The base URL is deployment configuration; request paths are relative to
/// it. The proxy adds no retries on top of the single per-request timeout.
#[derive(Debug, Clone)]
pub struct DownstreamConfig {
    /// Base URL of the masterdata service, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout for downstream calls.
    pub request_timeout: Duration,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8086/v1/masterdata".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Audit sink configuration.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Remote audit endpoint; `None` keeps records in the trace log only.
    pub endpoint: Option<String>,
    /// Timeout for a single audit write.
    pub request_timeout: Duration,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout: crate::audit::DEFAULT_AUDIT_TIMEOUT,
        }
    }
}
