//! HTTP API and browser dashboard.
//!
//! - `GET /` serves the dashboard page
//! - `GET /scan?subnet=<CIDR>` runs a two-phase scan
//! - `POST /export/:format` encodes results the dashboard already holds
//! - `GET /health` reports liveness
//!
//! No authentication: the server is meant for trusted networks.

mod routes;

use crate::config::AppSettings;
use crate::discovery::{create_prober, HostDiscovery};
use crate::error::ConfigResult;
use crate::scanner::{PortProber, ScanOptions, TcpConnectScanner};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub discovery: HostDiscovery,
    pub prober: Arc<dyn PortProber>,
    pub options: Arc<ScanOptions>,
    pub default_subnet: Arc<str>,
}

impl AppState {
    /// Build the scanning engine described by `settings`.
    pub fn from_settings(settings: &AppSettings) -> ConfigResult<Self> {
        let liveness = create_prober(settings.probe, settings.ping_timeout(), settings.tcp_ports()?);
        let discovery = HostDiscovery::new(liveness, settings.discovery_concurrency);
        let prober = TcpConnectScanner::new(settings.connect_timeout(), settings.port_concurrency);

        Ok(Self {
            discovery,
            prober: Arc::new(prober),
            options: Arc::new(ScanOptions {
                ports: settings.ports()?,
                max_hosts: settings.max_hosts,
            }),
            default_subnet: Arc::from(settings.default_subnet.as_str()),
        })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::dashboard))
        .route("/health", get(routes::health))
        .route("/scan", get(routes::scan))
        .route("/export/:format", post(routes::export))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        // Without a signal handler, run until the process is killed.
        Err(_) => std::future::pending::<()>().await,
    }
}
