//! Relay request handler

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{validator, RelayState};

/// Inbound header names forwarded to the upstream target. Everything else,
/// including the relay's own hosting headers (host, cookies, forwarded-for),
/// is dropped before the upstream call.
const FORWARDED_HEADERS: [&str; 3] = ["content-type", "dd-api-key", "dd-application-key"];

/// CORS headers stamped on every response, error responses included.
const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    (
        "access-control-allow-headers",
        "Content-Type, DD-API-KEY, DD-APPLICATION-KEY",
    ),
];

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    url: Option<String>,
}

/// Single relay entry point for every method on `/`.
pub async fn handle(
    State(state): State<Arc<RelayState>>,
    method: Method,
    Query(params): Query<ProxyParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return with_cors(StatusCode::OK, None, Body::empty());
    }

    let Some(target) = params.url else {
        return error_response(StatusCode::BAD_REQUEST, "Missing \"url\" query parameter");
    };

    let target = match Url::parse(&target) {
        Ok(url) => url,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid URL format"),
    };

    if !validator::host_allowed(&target) {
        return error_response(
            StatusCode::FORBIDDEN,
            "Invalid target domain. Only Datadog domains are allowed.",
        );
    }

    forward(&state.http, method, target, &headers, body).await
}

/// Forwards the call and mirrors status, body, and content type back,
/// replacing all other upstream headers with the CORS set.
async fn forward(
    http: &reqwest::Client,
    method: Method,
    target: Url,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let mut request = http.request(method, target);

    for name in FORWARDED_HEADERS {
        if let Some(value) = headers.get(name) {
            request = request.header(name, value);
        }
    }

    if !body.is_empty() {
        request = request.body(body);
    }

    let upstream = match request.send().await {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::warn!(error = %e, "Upstream request failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Proxy error: {}", e),
            );
        }
    };

    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();

    match upstream.bytes().await {
        Ok(bytes) => with_cors(status, content_type, Body::from(bytes)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read upstream body");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Proxy error: {}", e),
            )
        }
    }
}

fn with_cors(status: StatusCode, content_type: Option<HeaderValue>, body: Body) -> Response {
    let mut builder = Response::builder().status(status);
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(body)
        .expect("static response parts are always valid")
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = json!({ "error": message }).to_string();
    with_cors(
        status,
        Some(HeaderValue::from_static("application/json")),
        Body::from(body),
    )
}
