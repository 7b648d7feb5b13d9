//! Integration tests for request classification and path rewriting.

use axum::http::Method;
use devserve::config::ProxyConfig;
use devserve::proxy::routing::{classify, rewrite_path, target_url, RouteKind};

#[test]
fn only_login_prefix_is_forwarded() {
    let config = ProxyConfig::new("http://localhost:1337");

    for path in ["/", "/index.html", "/api", "/api/", "/api/other", "/apilogin"] {
        for method in [Method::GET, Method::POST] {
            assert_eq!(classify(&config, &method, path), RouteKind::Static, "{method} {path}");
        }
    }
    for path in ["/api/login", "/api/login/", "/api/login/status", "/api/loginx"] {
        assert_eq!(classify(&config, &Method::GET, path), RouteKind::Forward, "{path}");
    }
}

#[test]
fn custom_prefixes_are_honoured() {
    let config = ProxyConfig {
        api_prefix: "/auth".into(),
        api_root: "/auth".into(),
        ..ProxyConfig::new("http://localhost:7171")
    };

    assert_eq!(classify(&config, &Method::POST, "/auth/token"), RouteKind::Forward);
    assert_eq!(classify(&config, &Method::GET, "/api/login"), RouteKind::Static);
    assert_eq!(classify(&config, &Method::OPTIONS, "/auth/token"), RouteKind::Preflight);
    assert_eq!(classify(&config, &Method::OPTIONS, "/api/login"), RouteKind::Static);
    assert_eq!(
        target_url(&config, "/auth/token?grant=password"),
        "http://localhost:7171/token?grant=password"
    );
}

#[test]
fn upstream_trailing_slash_does_not_double() {
    let config = ProxyConfig::new("http://localhost:1337/");
    assert_eq!(target_url(&config, "/api/login"), "http://localhost:1337/");
    assert_eq!(
        target_url(&config, "/api/login/status"),
        "http://localhost:1337/status"
    );
}

#[test]
fn rewrite_keeps_non_slash_remainder_verbatim() {
    assert_eq!(rewrite_path("/api/login", "/api/loginx"), "x");
}
