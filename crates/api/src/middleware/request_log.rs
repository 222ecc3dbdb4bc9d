//! Request tracing and payload logging.
//!
//! Every request gets an `X-Request-ID` (propagated from the caller or
//! generated) and runs inside a span carrying it. When payload logging is
//! enabled the query string and JSON bodies of the request and response are
//! logged after redaction. Handlers and callers always see the original
//! bytes.

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Request, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use shared::redaction::Sanitizer;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

pub async fn request_log(State(state): State<AppState>, mut req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let log_payloads = state.config.logging.log_payloads;
    let max_body_size = state.config.server.max_body_size;
    let sanitizer = state.sanitizer.clone();

    async move {
        let start = Instant::now();

        let req = if log_payloads {
            log_query(&sanitizer, req.uri());
            match buffer_request(req, max_body_size, &sanitizer).await {
                Ok(req) => req,
                Err(err) => return err.into_response(),
            }
        } else {
            req
        };

        let response = next.run(req).await;

        let mut response = if log_payloads {
            buffer_response(response, &sanitizer).await
        } else {
            response
        };

        info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static("x-request-id"), value);
        }

        response
    }
    .instrument(span)
    .await
}

fn log_query(sanitizer: &Sanitizer, uri: &Uri) {
    if uri.query().map_or(true, str::is_empty) {
        return;
    }

    match Query::<HashMap<String, String>>::try_from_uri(uri) {
        Ok(Query(params)) => {
            let object: Map<String, Value> = params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            log_value(sanitizer, "request_query", &Value::Object(object));
        }
        Err(e) => debug!(error = %e, "Query string not logged"),
    }
}

async fn buffer_request(
    req: Request<Body>,
    limit: usize,
    sanitizer: &Sanitizer,
) -> Result<Request<Body>, ApiError> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| ApiError::Validation("Request body is too large or unreadable".to_string()))?;

    if is_json(&parts.headers) {
        log_body(sanitizer, "request_body", &bytes);
    }

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

async fn buffer_response(response: Response, sanitizer: &Sanitizer) -> Response {
    if !is_json(response.headers()) {
        return response;
    }

    let (parts, body) = response.into_parts();
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            log_body(sanitizer, "response_body", &bytes);
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(e) => {
            warn!(error = %e, "Failed to buffer response body");
            ApiError::Internal(format!("Failed to buffer response body: {}", e)).into_response()
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.starts_with("application/json"))
}

fn log_body(sanitizer: &Sanitizer, kind: &'static str, bytes: &Bytes) {
    if bytes.is_empty() {
        return;
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => log_value(sanitizer, kind, &value),
        Err(_) => debug!(kind, "Body is not valid JSON, not logged"),
    }
}

fn log_value(sanitizer: &Sanitizer, kind: &'static str, value: &Value) {
    match sanitizer.sanitize(value) {
        Ok(clean) => info!(kind, payload = %clean, "Payload"),
        Err(e) => warn!(kind, error = %e, "Payload not logged"),
    }
}
