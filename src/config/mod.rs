//! Configuration resolution.
//!
//! [`resolve`] turns the parsed CLI into an immutable [`Settings`]
//! value: it parses the [`ServeMode`] first (an unknown mode aborts
//! before anything else happens), layers CLI flags over an optional
//! config file, validates the result, and splits out the
//! [`ProxyConfig`] that the request router holds for the lifetime of
//! the process.

pub mod model;
pub mod sources;
pub mod validation;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::DevserveError;
use model::FileConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServeMode {
    #[default]
    Http,
    Https,
}

impl FromStr for ServeMode {
    type Err = DevserveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(DevserveError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ServeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http => "http",
            Self::Https => "https",
        })
    }
}

/// Forwarding settings shared read-only by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Upstream base URL without a trailing slash.
    pub upstream: String,
    pub api_prefix: String,
    pub api_root: String,
    pub timeout: Duration,
    pub forward_body: bool,
}

impl ProxyConfig {
    #[must_use]
    pub fn new(upstream: &str) -> Self {
        Self {
            upstream: upstream.trim_end_matches('/').to_string(),
            api_prefix: model::DEFAULT_API_PREFIX.to_string(),
            api_root: model::DEFAULT_API_ROOT.to_string(),
            timeout: Duration::from_secs(10),
            forward_body: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: ServeMode,
    pub host: String,
    pub port: u16,
    pub root: PathBuf,
    pub max_body: usize,
    pub tls: TlsPaths,
    pub proxy: ProxyConfig,
    /// Config file the settings were read from, if any.
    pub source: Option<PathBuf>,
}

/// Apply CLI flags over a file config. Unset flags leave the file value.
#[must_use]
pub fn apply_overrides(mut config: FileConfig, cli: &Cli) -> FileConfig {
    if let Some(ref host) = cli.host {
        config.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(ref root) = cli.root {
        config.root.clone_from(root);
    }
    if let Some(ref upstream) = cli.upstream {
        config.upstream.clone_from(upstream);
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    if let Some(max_body) = cli.max_body {
        config.max_body = max_body;
    }
    if cli.no_forward_body {
        config.forward_body = false;
    }
    if let Some(ref cert) = cli.cert {
        config.tls.cert.clone_from(cert);
    }
    if let Some(ref key) = cli.key {
        config.tls.key.clone_from(key);
    }
    config
}

/// Build validated [`Settings`] from a mode and a merged file config.
pub fn finalize(
    mode: ServeMode,
    config: FileConfig,
    source: Option<PathBuf>,
) -> Result<Settings, DevserveError> {
    validation::validate(&config, mode)
        .map_err(|errors| DevserveError::ConfigValidation { errors })?;

    Ok(Settings {
        mode,
        host: config.host,
        port: config.port,
        root: config.root,
        max_body: config.max_body,
        tls: TlsPaths {
            cert: config.tls.cert,
            key: config.tls.key,
        },
        proxy: ProxyConfig {
            upstream: config.upstream.trim_end_matches('/').to_string(),
            api_prefix: config.api_prefix,
            api_root: config.api_root,
            timeout: Duration::from_millis(config.timeout),
            forward_body: config.forward_body,
        },
        source,
    })
}

/// Resolve the process configuration from the command line.
pub fn resolve(cli: &Cli) -> Result<Settings, DevserveError> {
    let mode: ServeMode = cli.mode.parse()?;

    let (source, file_config) = match sources::load_file(cli.config.as_deref())? {
        Some((path, config)) => (Some(path), config),
        None => (None, FileConfig::default()),
    };

    finalize(mode, apply_overrides(file_config, cli), source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing_is_case_insensitive() {
        assert_eq!("http".parse::<ServeMode>().unwrap(), ServeMode::Http);
        assert_eq!("HTTPS".parse::<ServeMode>().unwrap(), ServeMode::Https);
    }

    #[test]
    fn unknown_mode_is_a_configuration_error() {
        let err = "ftp".parse::<ServeMode>().unwrap_err();
        assert!(matches!(err, DevserveError::InvalidMode(ref m) if m == "ftp"));
        assert!(err.to_string().contains("either http or https"));
    }

    #[test]
    fn resolve_rejects_unknown_mode_before_reading_config() {
        let cli = Cli {
            mode: "ftp".into(),
            config: Some("/nonexistent/devserve.yaml".into()),
            ..Cli::default()
        };
        assert!(matches!(resolve(&cli), Err(DevserveError::InvalidMode(_))));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let file = FileConfig {
            port: 9000,
            upstream: "http://file-upstream:1337".into(),
            ..FileConfig::default()
        };
        let cli = Cli {
            upstream: Some("http://cli-upstream:7171".into()),
            no_forward_body: true,
            ..Cli::default()
        };
        let merged = apply_overrides(file, &cli);
        assert_eq!(merged.port, 9000);
        assert_eq!(merged.upstream, "http://cli-upstream:7171");
        assert!(!merged.forward_body);
    }

    #[test]
    fn finalize_trims_trailing_slash_and_converts_timeout() {
        let config = FileConfig {
            upstream: "http://localhost:1337/".into(),
            timeout: 250,
            ..FileConfig::default()
        };
        let settings = finalize(ServeMode::Http, config, None).unwrap();
        assert_eq!(settings.proxy.upstream, "http://localhost:1337");
        assert_eq!(settings.proxy.timeout, Duration::from_millis(250));
        assert_eq!(settings.port, 8000);
    }

    #[test]
    fn finalize_reports_validation_errors() {
        let config = FileConfig {
            timeout: 0,
            ..FileConfig::default()
        };
        let err = finalize(ServeMode::Http, config, None).unwrap_err();
        assert!(matches!(err, DevserveError::ConfigValidation { ref errors } if errors.len() == 1));
    }
}
