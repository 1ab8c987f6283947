//! HTTP client for integration testing.
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`, no
//! listener involved.

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

/// Response with the body parsed as JSON (`Value::Null` when empty)
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
pub struct ApiClient {
    app: Router,
    correlation_id: Option<String>,
}

impl ApiClient {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            correlation_id: None,
        }
    }

    /// Send `X-Correlation-Id` on every request
    pub fn with_correlation_id(mut self, id: &str) -> Self {
        self.correlation_id = Some(id.to_string());
        self
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Send a raw body with a JSON content type
    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        let request = self
            .builder(Method::POST, uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.call(request).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = self.builder(method, uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.call(request).await
    }

    /// Send an arbitrary body, e.g. a stream with no Content-Length
    pub async fn post_body(&self, uri: &str, body: Body) -> TestResponse {
        let request = self
            .builder(Method::POST, uri)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        self.call(request).await
    }

    fn builder(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.correlation_id {
            Some(id) => builder.header("x-correlation-id", id),
            None => builder,
        }
    }

    async fn call(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
