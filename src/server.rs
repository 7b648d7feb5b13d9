//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared, read-only state holding the
//! proxy config, HTTP client and static asset service), [`build_router`]
//! for constructing the Axum router with middleware layers,
//! [`build_http_client`] for the upstream hyper client, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::proxy;

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub proxy: ProxyConfig,
    pub http_client: HttpClient,
    pub assets: ServeDir,
    pub max_body: usize,
}

impl AppState {
    #[must_use]
    pub fn new(proxy: ProxyConfig, root: &Path, max_body: usize) -> Self {
        Self {
            proxy,
            http_client: build_http_client(),
            assets: ServeDir::new(root),
            max_body,
        }
    }
}

/// Install `ring` as the process-wide rustls provider. Idempotent.
pub fn install_crypto_provider() {
    // Fails only when a provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    install_crypto_provider();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new()).build(https)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body = state.max_body;
    Router::new()
        .fallback(proxy::route_request)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
