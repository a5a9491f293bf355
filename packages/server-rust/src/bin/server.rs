//! Resident masterdata proxy server binary.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use resident_server::network::config::{AuditConfig, DownstreamConfig, NetworkConfig, ProxyConfig};
use resident_server::{HttpMasterdataClient, ProxyModule};

#[derive(Debug, Parser)]
#[command(name = "resident-proxy", about = "Resident masterdata proxy server")]
struct Args {
    /// Bind address.
    #[arg(long, env = "RESIDENT_PROXY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Listen port (0 = OS-assigned).
    #[arg(long, env = "RESIDENT_PROXY_PORT", default_value_t = 8099)]
    port: u16,

    /// Base URL of the downstream masterdata service.
    #[arg(long, env = "RESIDENT_PROXY_MASTERDATA_URL")]
    masterdata_url: String,

    /// Remote audit sink; omit to keep audit records in the trace log.
    #[arg(long, env = "RESIDENT_PROXY_AUDIT_URL")]
    audit_url: Option<String>,

    /// Allowed CORS origins (repeatable); "*" allows any.
    #[arg(long = "cors-origin", env = "RESIDENT_PROXY_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    cors_origins: Vec<String>,

    /// Whole-request timeout in seconds.
    #[arg(long, env = "RESIDENT_PROXY_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Per-call downstream timeout in seconds.
    #[arg(long, env = "RESIDENT_PROXY_DOWNSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    downstream_timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> ProxyConfig {
        ProxyConfig {
            network: NetworkConfig {
                host: self.host,
                port: self.port,
                cors_origins: self.cors_origins,
                request_timeout: Duration::from_secs(self.request_timeout_secs),
            },
            downstream: DownstreamConfig {
                base_url: self.masterdata_url,
                request_timeout: Duration::from_secs(self.downstream_timeout_secs),
            },
            audit: AuditConfig {
                endpoint: self.audit_url,
                ..AuditConfig::default()
            },
            ..ProxyConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Args::parse().into_config();
    let client = Arc::new(HttpMasterdataClient::new(&config.downstream)?);

    let mut module = ProxyModule::new(config, client)?;
    let port = module.start().await?;
    info!(port, "resident masterdata proxy starting");

    module
        .serve(async {
            // Ctrl-C triggers the graceful drain.
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
