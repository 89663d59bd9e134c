//! Router tests for corporates, employee provisioning and auth accounts

#![allow(clippy::missing_panics_doc)]

mod common;

use axum::http::StatusCode;
use common::{corporate_row, json_request, multipart_request, request, send, test_app};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_corporate(server: &MockServer, seats: Option<u32>, employees: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/corporate"))
        .and(query_param("id", "eq.c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([corporate_row("c1", seats, employees)])))
        .mount(server)
        .await;
}

fn employee(name: &str, email: &str) -> serde_json::Value {
    json!({"name": name, "email": email, "phone": "9800000000"})
}

#[tokio::test]
async fn test_dry_run_reports_without_creating() {
    let server = MockServer::start().await;
    mount_corporate(&server, Some(10), &["old@acme.test"]).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/create-user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = send(
        test_app(&server),
        json_request(
            "POST",
            "/admin/corporates/c1/employees",
            &json!({
                "rows": [
                    employee("Old Timer", "OLD@acme.test"),
                    {"name": "Asha", "email": "asha@acme.test", "phone": "98", "password": "secret99"},
                    {"name": "", "email": "not-an-email", "phone": ""}
                ],
                "dry_run": true
            }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["to_create"], json!(["asha@acme.test"]));
    assert_eq!(body["skipped"], json!(["old@acme.test"]));
    assert_eq!(body["rejected"][0]["row"], 3);
    assert_eq!(body["rejected"][0]["field"], "name");
    assert_eq!(body["remaining_seats"], 9);
    assert_eq!(body["fits_seats"], true);
    assert!(!response.body.windows(8).any(|w| w == b"secret99"));
}

#[tokio::test]
async fn test_provision_creates_then_attaches() {
    let server = MockServer::start().await;
    mount_corporate(&server, None, &[]).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/create-user"))
        .and(header_exists("Idempotency-Key"))
        .and(header("x-admin-key", common::ADMIN_KEY))
        .and(body_partial_json(json!({"users": [{
            "email": "asha@acme.test",
            "role": "corporate_employee",
            "subscription_plan": "corporate-basic",
            "corporate_id": "c1"
        }]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1,
            "failed": 0,
            "users": [{"id": "u1", "email": "asha@acme.test"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/corporates/c1/employees"))
        .and(body_partial_json(json!({"employees": [{"user_id": "u1", "email": "asha@acme.test"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let response = send(
        test_app(&server),
        json_request(
            "POST",
            "/admin/corporates/c1/employees",
            &json!({"rows": [employee("Asha", "Asha@Acme.test")]}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["created"], 1);
    assert_eq!(body["failed"], 0);
}

#[tokio::test]
async fn test_provision_over_seat_limit_creates_nothing() {
    let server = MockServer::start().await;
    mount_corporate(&server, Some(1), &["old@acme.test"]).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/create-user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = send(
        test_app(&server),
        json_request(
            "POST",
            "/admin/corporates/c1/employees",
            &json!({"rows": [employee("Asha", "asha@acme.test")]}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["code"], "SEAT_LIMIT_EXCEEDED");
    assert_eq!(body["details"], json!({"requested": 1, "available": 0}));
}

#[tokio::test]
async fn test_provision_needs_rows() {
    let server = MockServer::start().await;

    let response = send(
        test_app(&server),
        json_request("POST", "/admin/corporates/c1/employees", &json!({"rows": []})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_import_csv_dry_run() {
    let server = MockServer::start().await;
    mount_corporate(&server, Some(5), &[]).await;

    let csv = b"Employee Name,Email Address,Phone Number\nAsha,asha@acme.test,9800000000\nBilal,,9811111111\n";
    let response = send(
        test_app(&server),
        multipart_request(
            "/admin/corporates/c1/employees/import",
            &[
                ("file", Some("staff.csv"), &csv[..]),
                ("dry_run", None, &b"true"[..]),
            ],
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["to_create"], json!(["asha@acme.test"]));
    assert_eq!(body["rejected"][0]["row"], 3);
    assert_eq!(body["rejected"][0]["field"], "email");
}

#[tokio::test]
async fn test_import_requires_file() {
    let server = MockServer::start().await;

    let response = send(
        test_app(&server),
        multipart_request(
            "/admin/corporates/c1/employees/import",
            &[("default_plan", None, &b"gold"[..])],
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"]["field"], "file");
}

#[tokio::test]
async fn test_import_rejects_unknown_file_type() {
    let server = MockServer::start().await;

    let response = send(
        test_app(&server),
        multipart_request(
            "/admin/corporates/c1/employees/import",
            &[("file", Some("staff.pdf"), &b"%PDF"[..])],
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_add_single_employee_already_present() {
    let server = MockServer::start().await;
    mount_corporate(&server, None, &["asha@acme.test"]).await;

    let response = send(
        test_app(&server),
        json_request(
            "POST",
            "/admin/corporates/c1/employees/single",
            &json!({"employee": employee("Asha", "asha@acme.test")}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"]["field"], "email");
}

#[tokio::test]
async fn test_remove_employee() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/corporates/c1/employees/u9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = send(
        test_app(&server),
        request("DELETE", "/admin/corporates/c1/employees/u9"),
    )
    .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_create_corporate_creates_login_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/create-user"))
        .and(body_partial_json(json!({"email": "hr@acme.test", "role": "corporate"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "auth-1", "email": "hr@acme.test"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/corporate"))
        .and(body_partial_json(json!({"name": "Acme", "auth_user_id": "auth-1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "c7",
            "name": "Acme",
            "email": "hr@acme.test",
            "auth_user_id": "auth-1"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let response = send(
        test_app(&server),
        json_request(
            "POST",
            "/admin/corporates",
            &json!({"name": "Acme", "email": "HR@acme.test", "password": "welcome1"}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["id"], "c7");
}

#[tokio::test]
async fn test_create_corporate_invalid_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/create-user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = send(
        test_app(&server),
        json_request("POST", "/admin/corporates", &json!({"name": "Acme", "email": "nope"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/create-user"))
        .and(body_partial_json(json!({"email": "ravi@example.test", "name": "Ravi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "u5", "email": "ravi@example.test"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = send(
        test_app(&server),
        json_request(
            "POST",
            "/admin/accounts",
            &json!({"email": "ravi@example.test", "name": "Ravi", "password": "hunter22"}),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["id"], "u5");
}

#[tokio::test]
async fn test_delete_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/delete-user"))
        .and(body_json(json!({"user_id": "u5"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let response = send(test_app(&server), request("DELETE", "/admin/users/u5/account")).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_account_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/delete-user"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let response = send(test_app(&server), request("DELETE", "/admin/users/u5/account")).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.json()["code"], "UPSTREAM_ERROR");
}
