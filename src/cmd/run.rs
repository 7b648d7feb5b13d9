//! `devserve [http|https]`: start the server.
//!
//! Resolves the configuration (an unknown mode or an invalid config
//! aborts here, before any socket is bound), loads TLS material in
//! https mode, then serves until Ctrl+C / SIGTERM.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Cli;
use crate::config::{self, ServeMode, Settings};
use crate::error::DevserveError;
use crate::logging;
use crate::server::{self, AppState};
use crate::tls;

const TLS_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub async fn execute(cli: &Cli) -> Result<(), DevserveError> {
    let log_format = logging::resolve_format(cli.pretty, cli.json);
    logging::init(&cli.log_level, log_format);

    let settings = config::resolve(cli)?;
    serve(settings).await
}

pub async fn serve(settings: Settings) -> Result<(), DevserveError> {
    let addr = resolve_listen_addr(&settings.host, settings.port).await?;

    if let Some(ref source) = settings.source {
        tracing::info!(path = %source.display(), "loaded config file");
    }
    if !settings.root.is_dir() {
        tracing::warn!(
            root = %settings.root.display(),
            "static root is not a directory, asset requests will return 404"
        );
    }

    let tls_config = match settings.mode {
        ServeMode::Https => Some(tls::load(&settings.tls).await?),
        ServeMode::Http => None,
    };

    let state = Arc::new(AppState::new(
        settings.proxy.clone(),
        &settings.root,
        settings.max_body,
    ));
    let router = server::build_router(state);

    match tls_config {
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            log_started(listener.local_addr()?, &settings);

            axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(server::shutdown_signal())
                .await?;
        }
        Some(tls_config) => {
            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();
            tokio::spawn(async move {
                server::shutdown_signal().await;
                shutdown_handle.graceful_shutdown(Some(TLS_SHUTDOWN_GRACE));
            });

            log_started(addr, &settings);

            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await?;
        }
    }

    tracing::info!("devserve stopped");
    Ok(())
}

/// Resolve `host` (an IP literal or a hostname) to the first matching
/// socket address.
pub async fn resolve_listen_addr(host: &str, port: u16) -> Result<SocketAddr, DevserveError> {
    let resolve_error = |source| DevserveError::AddressResolve {
        host: host.to_string(),
        source,
    };
    tokio::net::lookup_host((host, port))
        .await
        .map_err(resolve_error)?
        .next()
        .ok_or_else(|| resolve_error(io::Error::new(io::ErrorKind::NotFound, "no addresses found")))
}

fn log_started(addr: SocketAddr, settings: &Settings) {
    tracing::info!(
        addr = %addr,
        mode = %settings.mode,
        root = %settings.root.display(),
        "serving static assets"
    );
    tracing::info!(
        prefix = %settings.proxy.api_prefix,
        upstream = %settings.proxy.upstream,
        timeout_ms = settings.proxy.timeout.as_millis(),
        forward_body = settings.proxy.forward_body,
        "proxying login API"
    );
}
