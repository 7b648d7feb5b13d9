//! Request classification and upstream path rewriting.
//!
//! [`classify`] decides, from method and path alone, whether a request
//! is forwarded to the login server, answered locally as a CORS
//! preflight, or handed to the static asset service. [`target_url`]
//! builds the upstream URL for forwarded requests.

use axum::http::Method;

use crate::config::ProxyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// GET/POST under the API prefix.
    Forward,
    /// OPTIONS under the API root.
    Preflight,
    /// Everything else.
    Static,
}

#[must_use]
pub fn classify(config: &ProxyConfig, method: &Method, path: &str) -> RouteKind {
    if *method == Method::OPTIONS {
        if path.starts_with(&config.api_root) {
            RouteKind::Preflight
        } else {
            RouteKind::Static
        }
    } else if (*method == Method::GET || *method == Method::POST)
        && path.starts_with(&config.api_prefix)
    {
        RouteKind::Forward
    } else {
        RouteKind::Static
    }
}

/// Strip `prefix` from `path_and_query`. An empty remainder becomes `/`
/// and a bare query gets a leading `/`; anything else is carried through
/// unchanged.
#[must_use]
pub fn rewrite_path(prefix: &str, path_and_query: &str) -> String {
    let rest = path_and_query
        .strip_prefix(prefix)
        .unwrap_or(path_and_query);

    if rest.is_empty() {
        "/".to_string()
    } else if rest.starts_with('?') {
        format!("/{rest}")
    } else {
        rest.to_string()
    }
}

#[must_use]
pub fn target_url(config: &ProxyConfig, path_and_query: &str) -> String {
    format!(
        "{}{}",
        config.upstream,
        rewrite_path(&config.api_prefix, path_and_query)
    )
}
