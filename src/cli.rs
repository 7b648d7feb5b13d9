//! Command-line interface definitions using clap derive macros.
//!
//! The positional `mode` argument selects plain HTTP or HTTPS. Every
//! other flag overrides the matching config file field and has an
//! environment variable equivalent. Flags left unset fall through to
//! the config file, then to built-in defaults.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "devserve",
    version,
    about = "Static asset server with a CORS-enabled login API proxy",
    after_help = "\x1b[1mExamples:\x1b[0m\n  \
        devserve                                   Serve ./client over HTTP on :8000\n  \
        devserve https                             Serve over HTTPS with ./ssl/localhost.{crt,key}\n  \
        devserve --upstream http://localhost:7171  Proxy /api/login to another login server\n  \
        devserve --check                           Validate the resolved config and exit"
)]
pub struct Cli {
    /// Server mode: http or https
    #[arg(default_value = "http")]
    pub mode: String,

    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "DEVSERVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory served as static assets
    #[arg(short, long, env = "DEVSERVE_ROOT")]
    pub root: Option<PathBuf>,

    /// Base URL of the login server that /api/login is forwarded to
    #[arg(short, long, env = "LOGIN_SERVER")]
    pub upstream: Option<String>,

    /// Validate the resolved configuration and exit without serving
    #[arg(long)]
    pub check: bool,

    // -- TLS --
    /// PEM certificate used in https mode
    #[arg(long, env = "TLS_CERT", help_heading = "TLS")]
    pub cert: Option<PathBuf>,

    /// PEM private key used in https mode
    #[arg(long, env = "TLS_KEY", help_heading = "TLS")]
    pub key: Option<PathBuf>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Upstream request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", help_heading = "Tuning")]
    pub timeout: Option<u64>,

    /// Max request body size in bytes
    #[arg(long, env = "MAX_BODY_SIZE", help_heading = "Tuning")]
    pub max_body: Option<usize>,

    /// Drop request bodies instead of forwarding them upstream
    #[arg(long, help_heading = "Tuning")]
    pub no_forward_body: bool,
}

/// Matches what clap produces for an empty command line.
impl Default for Cli {
    fn default() -> Self {
        Self {
            mode: "http".into(),
            config: None,
            host: None,
            port: None,
            root: None,
            upstream: None,
            check: false,
            cert: None,
            key: None,
            log_level: LogLevel::Info,
            pretty: false,
            json: false,
            timeout: None,
            max_body: None,
            no_forward_body: false,
        }
    }
}

#[derive(Clone, Debug, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}
