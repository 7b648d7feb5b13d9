//! Request dispatch: login API forwarding, CORS preflights, static assets.
//!
//! The [`route_request`] function is the Axum fallback that receives
//! every request. It classifies the request ([`routing`]), then either
//! answers a preflight ([`headers`]), forwards to the login server
//! ([`forward`]), or hands the request to the static asset service.
//! Responses for paths under the API root always carry
//! `Access-Control-Allow-Origin: *`.

pub mod forward;
pub mod headers;
pub mod routing;

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use tower::ServiceExt;

use crate::server::AppState;
use routing::RouteKind;

pub async fn route_request(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let under_api_root = request.uri().path().starts_with(&state.proxy.api_root);
    let kind = routing::classify(&state.proxy, request.method(), request.uri().path());

    let mut response = match kind {
        RouteKind::Preflight => headers::preflight_response(),
        RouteKind::Forward => forward_request(&state, request).await,
        RouteKind::Static => serve_static(&state, request).await,
    };

    if under_api_root {
        headers::allow_any_origin(&mut response);
    }
    response
}

async fn forward_request(state: &AppState, request: Request) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |pq| pq.as_str());

    tracing::info!(
        request_id = %request_id,
        method = %parts.method,
        path = %path_and_query,
        "forwarding to login server"
    );

    let body = match axum::body::to_bytes(body, state.max_body).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "failed to read request body");
            return (body_error_status(&e), e.to_string()).into_response();
        }
    };

    let outcome = forward::forward(forward::ForwardRequest {
        client: &state.http_client,
        config: &state.proxy,
        method: &parts.method,
        path_and_query,
        content_type: parts.headers.get(CONTENT_TYPE),
        body,
        request_id: &request_id,
    })
    .await;

    match outcome {
        Ok(relayed) => {
            tracing::info!(
                request_id = %request_id,
                status = relayed.status.as_u16(),
                bytes = relayed.body.len(),
                "relayed upstream response"
            );
            relayed.into_response()
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                status = e.status().as_u16(),
                error = %e,
                "forwarding failed"
            );
            e.into_response()
        }
    }
}

/// 413 when the body ran past `max_body`, 400 for any other read failure
/// (e.g. the client aborting mid-body).
fn body_error_status(err: &axum::Error) -> StatusCode {
    let too_large = std::iter::successors(
        Some(err as &(dyn std::error::Error + 'static)),
        |e| e.source(),
    )
    .any(|e| e.is::<LengthLimitError>());

    if too_large {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    }
}

async fn serve_static(state: &AppState, request: Request) -> Response {
    let result: Result<_, Infallible> = state.assets.clone().oneshot(request).await;
    match result {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
