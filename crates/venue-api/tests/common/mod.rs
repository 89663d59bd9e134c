//! Shared setup for router tests

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Once;
use tower::ServiceExt;
use venue_api::{AppState, app};
use venue_core::Config;
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Key sent as `x-admin-key`
pub const ADMIN_KEY: &str = "admin-test-key";

/// Configuration with both upstreams on one mock server
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.backend.url = server.uri();
    config.backend.anon_key = "anon-test-key".to_string();
    config.backend.service_key = Some("service-test-key".to_string());
    config.endpoints.base_url = server.uri();
    config.endpoints.admin_key = Some(ADMIN_KEY.to_string());
    config.endpoints.timeout_seconds = 5;
    config.backend.timeout_seconds = 5;
    config.search.debounce_ms = 50;
    config
}

/// Router over a mock server
pub fn test_app(server: &MockServer) -> Router {
    init_test_logging();
    app(AppState::new(test_config(server)).unwrap().shared())
}

/// Router built from an adjusted configuration
pub fn test_app_with(server: &MockServer, adjust: impl FnOnce(&mut Config)) -> Router {
    init_test_logging();
    let mut config = test_config(server);
    adjust(&mut config);
    app(AppState::new(config).unwrap().shared())
}

/// Response status, headers and raw body
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON, `Null` when empty
    pub fn json(&self) -> Value {
        if self.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.body).unwrap()
        }
    }

    /// Header as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Send a request through the router
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
    TestResponse { status, headers, body }
}

/// Request without a body
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Request with a JSON body
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Boundary used by [`multipart_request`]
pub const BOUNDARY: &str = "venue-test-boundary";

/// `multipart/form-data` request from `(name, filename, content)` parts
pub fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Stored restaurant row
pub fn restaurant_row(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "city": "Pune",
        "facilities": ["wifi", "Car Parking", "Rooftop"],
        "opening_hours": {"monday": "09:00 - 22:00", "sunday": "Closed", "tuesday": "late"},
        "is_active": true,
        "created_at": "2024-05-01T10:00:00Z"
    })
}

/// Stored corporate row
pub fn corporate_row(id: &str, seats: Option<u32>, employees: &[&str]) -> Value {
    let employees: Vec<Value> = employees
        .iter()
        .map(|email| json!({"name": "Existing", "email": email, "user_id": "u-existing"}))
        .collect();
    json!({
        "id": id,
        "name": "Acme",
        "email": "hr@acme.test",
        "seats": seats,
        "subscription_plan": "corporate-basic",
        "employees": employees
    })
}
