// Masked payload logging
//
// Every request that reaches a handler produces two INFO events on target
// `pii`: one for the inbound payload and one for the outbound response body.
// Both payloads go through the PII redactor first. Logging never fails a
// request: problems reading or masking a payload degrade to a warning.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{MatchedPath, Request},
    http::{header::CONTENT_LENGTH, HeaderMap, Method, Uri},
    middleware::Next,
    response::Response,
    Extension,
};
use chrono::{Local, SecondsFormat};
use futures::stream::{self, StreamExt};

use super::correlation::CorrelationId;
use crate::common::pii::redact_text;

/// Bodies above this size are logged as a placeholder
pub const MAX_LOGGED_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Request => write!(f, "REQUEST"),
            Direction::Response => write!(f, "RESPONSE"),
        }
    }
}

/// `"<METHOD> <route>"`, falling back to the raw path when no route matched
pub fn handler_name(method: &Method, matched_path: Option<&str>, uri: &Uri) -> String {
    format!("{} {}", method, matched_path.unwrap_or_else(|| uri.path()))
}

pub fn render_line(
    timestamp: &str,
    correlation_id: Option<&CorrelationId>,
    direction: Direction,
    handler: &str,
    masked_payload: &str,
) -> String {
    format!(
        "[{}] [corr:{}] [{}] {} -> {}",
        timestamp,
        correlation_id.map(CorrelationId::as_str).unwrap_or("-"),
        direction,
        handler,
        masked_payload
    )
}

/// Redact `payload` and emit it as one INFO event on target `pii`
pub fn log_payload(
    direction: Direction,
    handler: &str,
    correlation_id: Option<&CorrelationId>,
    payload: &str,
) {
    let masked = match catch_unwind(AssertUnwindSafe(|| redact_text(payload))) {
        Ok(masked) => masked,
        Err(_) => {
            tracing::warn!(
                handler = %handler,
                direction = %direction,
                "Payload redaction failed, payload not logged"
            );
            return;
        }
    };

    let timestamp = log_timestamp();
    let line = render_line(&timestamp, correlation_id, direction, handler, &masked);

    tracing::info!(
        target: "pii",
        timestamp = %timestamp,
        correlation_id = correlation_id.map(CorrelationId::as_str).unwrap_or("-"),
        direction = %direction,
        handler = %handler,
        "{}",
        line
    );
}

/// Local time with millisecond precision and UTC offset
fn log_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Text form of a captured body, or a placeholder when it is too large
pub fn body_text(bytes: &Bytes) -> String {
    if bytes.len() > MAX_LOGGED_BODY_BYTES {
        omitted(bytes.len())
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn omitted(len: usize) -> String {
    format!("<body of {} bytes omitted>", len)
}

/// Request body read for logging, with the body to hand on to the handler
enum CapturedBody {
    Complete(Bytes),
    Oversized(Body),
    Failed { error: String, body: Body },
}

/// Read a body of unknown length until it ends or passes `MAX_LOGGED_BODY_BYTES`
///
/// Whatever was read is replayed in front of the unread remainder, so the
/// handler sees the same bytes (or the same read error) it would have seen
/// without logging.
async fn capture_body(body: Body) -> CapturedBody {
    let mut rest = body.into_data_stream();
    let mut buffered = Vec::new();

    while let Some(chunk) = rest.next().await {
        match chunk {
            Ok(chunk) => {
                buffered.extend_from_slice(&chunk);
                if buffered.len() > MAX_LOGGED_BODY_BYTES {
                    let head = stream::once(async move { Ok(Bytes::from(buffered)) });
                    return CapturedBody::Oversized(Body::from_stream(head.chain(rest)));
                }
            }
            Err(e) => {
                let error = e.to_string();
                let replay = stream::iter(vec![Ok(Bytes::from(buffered)), Err(e)]);
                return CapturedBody::Failed {
                    error,
                    body: Body::from_stream(replay),
                };
            }
        }
    }

    CapturedBody::Complete(Bytes::from(buffered))
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

fn path_and_query(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Middleware to log masked request and response payloads
///
/// Must run inside `extract_correlation_id` so the correlation id is already
/// in request extensions.
pub async fn log_payloads(
    correlation_id: Option<Extension<CorrelationId>>,
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let correlation_id = correlation_id.map(|Extension(id)| id);
    let handler = handler_name(
        request.method(),
        matched_path.as_ref().map(MatchedPath::as_str),
        request.uri(),
    );

    let (parts, body) = request.into_parts();
    let body = match declared_length(&parts.headers) {
        Some(len) if len > MAX_LOGGED_BODY_BYTES => {
            log_payload(
                Direction::Request,
                &handler,
                correlation_id.as_ref(),
                &omitted(len),
            );
            body
        }
        _ => match capture_body(body).await {
            CapturedBody::Complete(bytes) => {
                let payload = if bytes.is_empty() {
                    path_and_query(&parts.uri)
                } else {
                    body_text(&bytes)
                };
                log_payload(
                    Direction::Request,
                    &handler,
                    correlation_id.as_ref(),
                    &payload,
                );
                Body::from(bytes)
            }
            CapturedBody::Oversized(body) => {
                log_payload(
                    Direction::Request,
                    &handler,
                    correlation_id.as_ref(),
                    &format!("<body over {} bytes omitted>", MAX_LOGGED_BODY_BYTES),
                );
                body
            }
            CapturedBody::Failed { error, body } => {
                tracing::warn!(
                    handler = %handler,
                    error = %error,
                    "Failed to read request body for payload logging"
                );
                body
            }
        },
    };

    let response = next.run(Request::from_parts(parts, body)).await;

    let (mut parts, body) = response.into_parts();
    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            log_payload(
                Direction::Response,
                &handler,
                correlation_id.as_ref(),
                &body_text(&bytes),
            );
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(e) => {
            tracing::warn!(
                handler = %handler,
                error = %e,
                "Failed to read response body for payload logging"
            );
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::empty())
        }
    }
}
