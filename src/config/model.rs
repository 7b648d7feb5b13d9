//! Serde data structures for the devserve configuration file.
//!
//! [`FileConfig`] is the root; every field is optional in the file and
//! falls back to the defaults below. All types derive `Deserialize`
//! with `deny_unknown_fields` for strict parsing.

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_UPSTREAM: &str = "http://localhost:1337";
pub const DEFAULT_API_PREFIX: &str = "/api/login";
pub const DEFAULT_API_ROOT: &str = "/api/";

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_root() -> PathBuf {
    PathBuf::from("client")
}

fn default_upstream() -> String {
    DEFAULT_UPSTREAM.to_string()
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

fn default_api_root() -> String {
    DEFAULT_API_ROOT.to_string()
}

const fn default_timeout() -> u64 {
    10_000
}

const fn default_max_body() -> usize {
    1_048_576
}

const fn default_true() -> bool {
    true
}

fn default_cert() -> PathBuf {
    PathBuf::from("./ssl/localhost.crt")
}

fn default_key() -> PathBuf {
    PathBuf::from("./ssl/localhost.key")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served as static assets.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Login server base URL (scheme, host and port).
    #[serde(default = "default_upstream")]
    pub upstream: String,

    /// Requests whose path starts with this prefix are forwarded.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Preflights under this prefix are answered locally.
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// Upstream timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_body")]
    pub max_body: usize,

    #[serde(default = "default_true")]
    pub forward_body: bool,

    #[serde(default)]
    pub tls: TlsConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root: default_root(),
            upstream: default_upstream(),
            api_prefix: default_api_prefix(),
            api_root: default_api_root(),
            timeout: default_timeout(),
            max_body: default_max_body(),
            forward_body: default_true(),
            tls: TlsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsConfig {
    #[serde(default = "default_cert")]
    pub cert: PathBuf,

    #[serde(default = "default_key")]
    pub key: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert: default_cert(),
            key: default_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_object_yields_defaults() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.port, 8000);
        assert_eq!(config.upstream, "http://localhost:1337");
        assert_eq!(config.timeout, 10_000);
        assert!(config.forward_body);
    }

    #[test]
    fn partial_tls_section_keeps_other_default() {
        let config: FileConfig =
            serde_json::from_str(r#"{"tls": {"cert": "certs/dev.pem"}}"#).unwrap();
        assert_eq!(config.tls.cert, PathBuf::from("certs/dev.pem"));
        assert_eq!(config.tls.key, PathBuf::from("./ssl/localhost.key"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<FileConfig>(r#"{"upstreams": []}"#);
        assert!(result.is_err());
    }
}
