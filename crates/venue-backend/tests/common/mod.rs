//! Shared setup for backend integration tests

#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Once;
use venue_backend::{BackendClient, EndpointsClient};
use venue_core::config::{BackendConfig, EndpointsConfig};
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

/// Key sent as `apikey`
pub const ANON_KEY: &str = "anon-test-key";

/// Key sent as bearer token
pub const SERVICE_KEY: &str = "service-test-key";

/// Key sent as `x-admin-key`
pub const ADMIN_KEY: &str = "admin-test-key";

/// Backend configuration pointing at a mock server
pub fn backend_config(server: &MockServer) -> BackendConfig {
    BackendConfig {
        url: server.uri(),
        anon_key: ANON_KEY.to_string(),
        service_key: Some(SERVICE_KEY.to_string()),
        schema: "public".to_string(),
        storage_bucket: "images".to_string(),
        timeout_seconds: 5,
    }
}

/// Endpoint configuration pointing at a mock server
pub fn endpoints_config(server: &MockServer) -> EndpointsConfig {
    EndpointsConfig {
        base_url: server.uri(),
        admin_key: Some(ADMIN_KEY.to_string()),
        timeout_seconds: 5,
    }
}

/// Both clients pointing at one mock server
pub fn clients(server: &MockServer) -> (BackendClient, EndpointsClient) {
    let backend = BackendClient::new(&backend_config(server)).unwrap();
    let endpoints = EndpointsClient::new(&endpoints_config(server)).unwrap();
    (backend, endpoints)
}

/// Stored restaurant row
pub fn restaurant_row(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "city": "Pune",
        "facilities": ["wifi", "Car Parking"],
        "opening_hours": {"monday": "09:00 - 22:00", "sunday": "Closed"},
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
