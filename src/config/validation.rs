//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a merged [`FileConfig`] for
//! problems such as a malformed upstream URL, prefixes that do not start
//! with `/`, zero timeouts, and (in https mode) missing certificate
//! files. Every problem is collected before returning so the user can
//! fix them in one pass.

use std::net::IpAddr;

use url::{Host, Url};

use super::model::FileConfig;
use super::ServeMode;
use crate::error::ValidationError;

/// Validate an upstream base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_upstream(upstream: &str) -> Result<(), String> {
    let parsed = Url::parse(upstream).map_err(|_| format!("'{upstream}' is not a valid URL"))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "unsupported scheme '{scheme}' (expected http or https)"
        ));
    }
    if parsed.host_str().is_none() {
        return Err(format!("'{upstream}' has no host"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err("upstream must not carry a query or fragment".into());
    }
    Ok(())
}

/// Validate a listen address: an IP literal or a hostname such as `localhost`.
pub fn validate_host(host: &str) -> Result<(), String> {
    if host.is_empty() {
        return Err("listen address cannot be empty".into());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(());
    }
    Host::parse(host)
        .map(|_| ())
        .map_err(|e| format!("'{host}' is not an IP address or hostname: {e}"))
}

/// Validate a path prefix. Returns `Ok(())` or a human-readable error.
pub fn validate_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() {
        return Err("prefix cannot be empty".into());
    }
    if !prefix.starts_with('/') {
        return Err("prefix must start with '/'".into());
    }
    Ok(())
}

pub fn validate(config: &FileConfig, mode: ServeMode) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_host(&config.host) {
        errors.push(ValidationError {
            field: "host".into(),
            message: msg,
            suggestion: Some("use '0.0.0.0' to listen on all interfaces".into()),
        });
    }

    if let Err(msg) = validate_upstream(&config.upstream) {
        errors.push(ValidationError {
            field: "upstream".into(),
            message: msg,
            suggestion: if config.upstream.contains("://") {
                None
            } else {
                Some(format!("did you mean 'http://{}'?", config.upstream))
            },
        });
    }

    for (field, prefix) in [
        ("api_prefix", &config.api_prefix),
        ("api_root", &config.api_root),
    ] {
        if let Err(msg) = validate_prefix(prefix) {
            errors.push(ValidationError {
                field: field.into(),
                message: msg,
                suggestion: if prefix.is_empty() {
                    None
                } else {
                    Some(format!("did you mean '/{prefix}'?"))
                },
            });
        }
    }

    if config.timeout == 0 {
        errors.push(ValidationError {
            field: "timeout".into(),
            message: "timeout must be greater than zero".into(),
            suggestion: Some("the default is 10000 ms".into()),
        });
    }

    if config.max_body == 0 {
        errors.push(ValidationError {
            field: "max_body".into(),
            message: "max_body must be greater than zero".into(),
            suggestion: None,
        });
    }

    if mode == ServeMode::Https {
        for (field, path) in [("tls.cert", &config.tls.cert), ("tls.key", &config.tls.key)] {
            if !path.is_file() {
                errors.push(ValidationError {
                    field: field.into(),
                    message: format!("{} does not exist", path.display()),
                    suggestion: Some("pass --cert/--key or run in http mode".into()),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(config: &FileConfig, mode: ServeMode) -> String {
    let mut lines = vec![
        format!("  mode:     {mode}"),
        format!("  listen:   {}:{}", config.host, config.port),
        format!("  root:     {}", config.root.display()),
        format!(
            "  proxy:    {}* -> {}",
            config.api_prefix, config.upstream
        ),
        format!("  cors:     {}*", config.api_root),
        format!("  timeout:  {}ms", config.timeout),
        format!(
            "  body:     {} (max {} bytes)",
            if config.forward_body {
                "forwarded"
            } else {
                "dropped"
            },
            config.max_body
        ),
    ];
    if mode == ServeMode::Https {
        lines.push(format!(
            "  tls:      {} / {}",
            config.tls.cert.display(),
            config.tls.key.display()
        ));
    }

    format!("configuration is valid\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_in_http_mode() {
        assert!(validate(&FileConfig::default(), ServeMode::Http).is_ok());
    }

    #[test]
    fn hostnames_and_ip_literals_are_valid_hosts() {
        for host in ["localhost", "0.0.0.0", "::", "::1", "dev.example.test"] {
            assert!(validate_host(host).is_ok(), "{host}");
        }
    }

    #[test]
    fn malformed_host_fails() {
        let config = FileConfig {
            host: "bad host".into(),
            ..FileConfig::default()
        };
        let errors = validate(&config, ServeMode::Http).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "host");
        assert!(validate_host("").is_err());
    }

    #[test]
    fn upstream_without_scheme_suggests_http() {
        let config = FileConfig {
            upstream: "localhost:1337".into(),
            ..FileConfig::default()
        };
        let errors = validate(&config, ServeMode::Http).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "upstream"
            && e.suggestion.as_deref() == Some("did you mean 'http://localhost:1337'?")));
    }

    #[test]
    fn unsupported_scheme_fails() {
        let config = FileConfig {
            upstream: "ftp://localhost:21".into(),
            ..FileConfig::default()
        };
        let errors = validate(&config, ServeMode::Http).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("unsupported scheme 'ftp'")));
    }

    #[test]
    fn upstream_with_query_fails() {
        assert!(validate_upstream("http://localhost:1337/?a=b").is_err());
        assert!(validate_upstream("http://localhost:1337").is_ok());
        assert!(validate_upstream("https://auth.example.test").is_ok());
    }

    #[test]
    fn relative_prefix_fails() {
        let config = FileConfig {
            api_prefix: "api/login".into(),
            ..FileConfig::default()
        };
        let errors = validate(&config, ServeMode::Http).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "api_prefix"
            && e.suggestion.as_deref() == Some("did you mean '/api/login'?")));
    }

    #[test]
    fn zero_timeout_and_body_limit_fail_together() {
        let config = FileConfig {
            timeout: 0,
            max_body: 0,
            ..FileConfig::default()
        };
        let errors = validate(&config, ServeMode::Http).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn https_requires_existing_certificate_files() {
        let config = FileConfig {
            tls: crate::config::model::TlsConfig {
                cert: "/nonexistent/dev.crt".into(),
                key: "/nonexistent/dev.key".into(),
            },
            ..FileConfig::default()
        };
        assert!(validate(&config, ServeMode::Http).is_ok());

        let errors = validate(&config, ServeMode::Https).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("dev.crt"));
    }

    #[test]
    fn report_mentions_upstream_and_mode() {
        let report = format_validation_report(&FileConfig::default(), ServeMode::Http);
        assert!(report.contains("mode:     http"));
        assert!(report.contains("/api/login* -> http://localhost:1337"));
        assert!(!report.contains("tls:"));
    }
}
