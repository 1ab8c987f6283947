use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Caller-supplied correlation id, stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware to read `X-Correlation-Id` into request extensions
///
/// A blank or non-ASCII header is treated as absent. When present, the same
/// value is echoed on the response.
pub async fn extract_correlation_id(mut request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| CorrelationId(value.to_string()));

    if let Some(id) = &correlation_id {
        request.extensions_mut().insert(id.clone());
    }

    let mut response = next.run(request).await;

    if let Some(id) = correlation_id {
        if let Ok(value) = HeaderValue::from_str(id.as_str()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(CORRELATION_ID_HEADER), value);
        }
    }

    response
}
