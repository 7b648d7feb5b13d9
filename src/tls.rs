//! TLS certificate loading for https mode.

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsPaths;
use crate::error::DevserveError;
use crate::server::install_crypto_provider;

/// Load a rustls server config from the PEM certificate and key files.
pub async fn load(paths: &TlsPaths) -> Result<RustlsConfig, DevserveError> {
    for path in [&paths.cert, &paths.key] {
        if !path.is_file() {
            return Err(DevserveError::Tls {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }
    }

    install_crypto_provider();

    RustlsConfig::from_pem_file(&paths.cert, &paths.key)
        .await
        .map_err(|source| DevserveError::Tls {
            path: paths.cert.clone(),
            source,
        })
}
