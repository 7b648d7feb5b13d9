//! Single-attempt forwarding to the login server.
//!
//! [`forward`] rewrites the path, performs one upstream call bounded by
//! the configured timeout, follows redirects within that same deadline,
//! and buffers the final response. The caller always
//! gets exactly one outcome: a [`Relayed`] response, or a
//! [`ForwardError`] that renders as 503 (unavailable), 500 (internal)
//! or the upstream status with an empty body.

use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use url::Url;

use super::headers::allow_any_origin;
use super::routing::target_url;
use crate::config::ProxyConfig;
use crate::server::HttpClient;

pub const UNAVAILABLE_BODY: &str = "Login server unavailable";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The response head arrived but its body could not be read.
    #[error("upstream responded with {0} but the body could not be read")]
    UpstreamStatus(StatusCode),

    /// Connection refused, DNS failure or timeout.
    #[error("login server unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ForwardError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UpstreamStatus(status) => *status,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = match self {
            Self::UpstreamStatus(_) => status.into_response(),
            Self::Unavailable(_) => (status, UNAVAILABLE_BODY).into_response(),
            Self::Internal(message) => (status, message).into_response(),
        };
        allow_any_origin(&mut response);
        response
    }
}

/// A fully buffered upstream response.
#[derive(Debug)]
pub struct Relayed {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Bytes,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, self.content_type);
        allow_any_origin(&mut response);
        response
    }
}

pub struct ForwardRequest<'a> {
    pub client: &'a HttpClient,
    pub config: &'a ProxyConfig,
    pub method: &'a Method,
    pub path_and_query: &'a str,
    pub content_type: Option<&'a HeaderValue>,
    pub body: Bytes,
    pub request_id: &'a str,
}

pub async fn forward(req: ForwardRequest<'_>) -> Result<Relayed, ForwardError> {
    let target = target_url(req.config, req.path_and_query);
    let mut uri: hyper::Uri = target.parse().map_err(|e: http::uri::InvalidUri| {
        ForwardError::Internal(format!("invalid target URL '{target}': {e}"))
    })?;

    // Only the body and its content type travel upstream.
    let (mut body, mut content_type) = if req.config.forward_body && !req.body.is_empty() {
        (req.body, req.content_type.cloned())
    } else {
        (Bytes::new(), None)
    };
    let mut method = req.method.clone();

    // The deadline covers every redirect hop and the final body.
    let deadline = tokio::time::Instant::now() + req.config.timeout;
    let mut hops = 0;

    loop {
        tracing::debug!(
            request_id = %req.request_id,
            method = %method,
            target = %uri,
            hop = hops,
            "dispatching upstream request"
        );

        let upstream_req = hyper::Request::builder()
            .method(method.clone())
            .uri(uri.clone());
        let upstream_req = match content_type {
            Some(ref value) => upstream_req.header(CONTENT_TYPE, value),
            None => upstream_req,
        }
        .body(Full::new(body.clone()))
        .map_err(|e| ForwardError::Internal(e.to_string()))?;

        let response =
            match tokio::time::timeout_at(deadline, req.client.request(upstream_req)).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) if e.is_connect() => {
                    return Err(ForwardError::Unavailable(error_chain(&e)));
                }
                Ok(Err(e)) => return Err(ForwardError::Internal(error_chain(&e))),
                Err(_) => {
                    return Err(ForwardError::Unavailable(format!(
                        "no response within {}ms",
                        req.config.timeout.as_millis()
                    )));
                }
            };

        let status = response.status();
        let next = if is_followed_redirect(status) {
            redirect_location(&uri, response.headers())?
        } else {
            None
        };
        let Some(next) = next else {
            return relay(response, deadline, req.request_id).await;
        };

        if hops == MAX_REDIRECTS {
            tracing::warn!(
                request_id = %req.request_id,
                status = status.as_u16(),
                hops,
                "too many upstream redirects"
            );
            return Err(ForwardError::UpstreamStatus(status));
        }
        hops += 1;

        let redirected = redirect_method(status, &method);
        if redirected != method {
            body = Bytes::new();
            content_type = None;
        }
        method = redirected;
        uri = next;
    }
}

/// Buffer the final upstream response within the remaining deadline.
async fn relay(
    response: hyper::Response<hyper::body::Incoming>,
    deadline: tokio::time::Instant,
    request_id: &str,
) -> Result<Relayed, ForwardError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    match tokio::time::timeout_at(deadline, response.into_body().collect()).await {
        Ok(Ok(collected)) => Ok(Relayed {
            status,
            content_type,
            body: collected.to_bytes(),
        }),
        Ok(Err(e)) => {
            tracing::warn!(
                request_id = %request_id,
                status = status.as_u16(),
                error = %e,
                "upstream body read failed"
            );
            Err(ForwardError::UpstreamStatus(status))
        }
        Err(_) => {
            tracing::warn!(
                request_id = %request_id,
                status = status.as_u16(),
                "upstream body timed out"
            );
            Err(ForwardError::UpstreamStatus(status))
        }
    }
}

const fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// 303 always becomes GET, 301/302 turn a POST into GET, 307/308 keep
/// the method and body.
fn redirect_method(status: StatusCode, method: &Method) -> Method {
    match status.as_u16() {
        303 => Method::GET,
        301 | 302 if *method == Method::POST => Method::GET,
        _ => method.clone(),
    }
}

/// Resolve a `Location` header against the URI that produced it. `None`
/// when the header is absent, in which case the 3xx is relayed as is.
fn redirect_location(
    current: &hyper::Uri,
    headers: &HeaderMap,
) -> Result<Option<hyper::Uri>, ForwardError> {
    let Some(location) = headers.get(LOCATION) else {
        return Ok(None);
    };

    let resolved = location
        .to_str()
        .ok()
        .and_then(|loc| Url::parse(&current.to_string()).ok()?.join(loc).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|mut url| {
            url.set_fragment(None);
            url
        })
        .ok_or_else(|| ForwardError::Internal(format!("cannot follow redirect to {location:?}")))?;

    resolved
        .as_str()
        .parse()
        .map(Some)
        .map_err(|e: http::uri::InvalidUri| {
            ForwardError::Internal(format!("invalid redirect target '{resolved}': {e}"))
        })
}

/// Render an error with its source chain, e.g.
/// `client error (Connect): tcp connect error: Connection refused`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
