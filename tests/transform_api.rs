//! HTTP-level tests for the transform endpoints
//!
//! These tests drive the full router with `oneshot` requests against a
//! temporary template directory; no server socket is opened.

use std::fs;
use std::path::Path;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use json_template_transform::config::Settings;
use json_template_transform::server::{create_app, AppState};

const ECHO_TEMPLATE: &str = r#"{"id": "{{ customerId }}", "name": "{{ personalInfo.firstName }} {{ personalInfo.lastName }}"}"#;

const CUSTOMER_TEMPLATE: &str = r#"{
  "id": {{ customerId | json_encode() }},
  "fullName": "{{ personalInfo.firstName }} {{ personalInfo.lastName }}",
  "accounts": [
    {% for account in accounts %}{"number": "{{ account.accountNumber }}", "balance": {{ account.balance }}, "currency": "{{ account.currency }}"}{% if not loop.last %},{% endif %}
    {% endfor %}
  ],
  "language": "{{ preferences.preferredLanguage }}",
  "notify": {{ preferences.emailNotifications }}
}"#;

struct TestApp {
    _dir: tempfile::TempDir,
    router: Router,
}

fn write_template(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn test_app(templates: &[(&str, &str)]) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in templates {
        write_template(dir.path(), name, body);
    }

    let mut settings = Settings::default();
    settings.templates.path = dir.path().to_path_buf();

    let state = AppState::new(settings).unwrap();
    TestApp {
        _dir: dir,
        router: create_app(state),
    }
}

async fn post_json(router: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

#[tokio::test]
async fn test_customer_echo_scenario() {
    let app = test_app(&[("echo.ftl", ECHO_TEMPLATE)]);

    let (status, body) = post_json(
        app.router,
        "/api/transform/customer?template=echo.ftl",
        r#"{"customerId":"C1","personalInfo":{"firstName":"Ann","lastName":"Lee"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "C1", "name": "Ann Lee"}));
}

#[tokio::test]
async fn test_customer_uses_default_template() {
    let app = test_app(&[("customer-transform.ftl", CUSTOMER_TEMPLATE)]);

    let input = json!({
        "customerId": "C42",
        "personalInfo": {"firstName": "Ann", "lastName": "Lee", "email": "ann@example.com"},
        "accounts": [
            {"accountNumber": "ACC-1", "accountType": "checking", "balance": 120.5, "currency": "USD", "status": "active"},
            {"accountNumber": "ACC-2", "accountType": "savings", "balance": 9000.75, "currency": "EUR", "status": "active"}
        ],
        "preferences": {"emailNotifications": true, "smsNotifications": false, "preferredLanguage": "en"}
    });

    let (status, body) = post_json(
        app.router,
        "/api/transform/customer",
        &input.to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": "C42",
            "fullName": "Ann Lee",
            "accounts": [
                {"number": "ACC-1", "balance": 120.5, "currency": "USD"},
                {"number": "ACC-2", "balance": 9000.75, "currency": "EUR"}
            ],
            "language": "en",
            "notify": true
        })
    );
}

#[tokio::test]
async fn test_customer_missing_accounts_is_render_error() {
    let app = test_app(&[(
        "accounts.ftl",
        r#"{"count": {{ accounts | length }}}"#,
    )]);

    let (status, body) = post_json(
        app.router,
        "/api/transform/customer?template=accounts.ftl",
        r#"{"customerId":"C1"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("accounts.ftl"));
}

#[tokio::test]
async fn test_raw_echo() {
    let app = test_app(&[("echo.ftl", ECHO_TEMPLATE)]);

    let (status, body) = post_json(
        app.router,
        "/api/transform/raw?template=echo.ftl",
        r#"{"customerId":"C1","personalInfo":{"firstName":"Ann","lastName":"Lee"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "C1", "name": "Ann Lee"}));
}

#[tokio::test]
async fn test_raw_accepts_any_content_type() {
    let app = test_app(&[("echo.ftl", r#"{"value": {{ value }}}"#)]);

    let request = Request::builder()
        .method("POST")
        .uri("/api/transform/raw?template=echo.ftl")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"value": 7}"#))
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"value": 7}));
}

#[tokio::test]
async fn test_raw_malformed_input() {
    let app = test_app(&[("echo.ftl", ECHO_TEMPLATE)]);

    let (status, body) = post_json(app.router, "/api/transform/raw?template=echo.ftl", "not-json").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(!message.is_empty());
    assert!(message.starts_with("Malformed input JSON"));
}

#[tokio::test]
async fn test_raw_malformed_input_with_missing_template() {
    let app = test_app(&[]);

    let (status, body) = post_json(app.router, "/api/transform/raw?template=any.ftl", "not-json").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_raw_non_object_input() {
    let app = test_app(&[("echo.ftl", ECHO_TEMPLATE)]);

    let (status, body) = post_json(app.router, "/api/transform/raw?template=echo.ftl", "[1, 2, 3]").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("expected a JSON object"));
}

#[tokio::test]
async fn test_raw_requires_template_param() {
    let app = test_app(&[("echo.ftl", ECHO_TEMPLATE)]);

    let request = Request::builder()
        .method("POST")
        .uri("/api/transform/raw")
        .body(Body::from(r#"{"customerId":"C1"}"#))
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_template_on_both_endpoints() {
    let app = test_app(&[]);

    let (status, body) = post_json(
        app.router.clone(),
        "/api/transform/customer?template=nope.ftl",
        r#"{"customerId":"C1"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Template not found: nope.ftl"}));

    let (status, body) = post_json(
        app.router,
        "/api/transform/raw?template=nope.ftl",
        r#"{"customerId":"C1"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Template not found: nope.ftl"}));
}

#[tokio::test]
async fn test_template_outside_directory_not_found() {
    let app = test_app(&[]);

    let (status, body) = post_json(
        app.router,
        "/api/transform/raw?template=../Cargo.toml",
        r#"{}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Template not found"));
}

#[tokio::test]
async fn test_undefined_variable_is_error() {
    let app = test_app(&[("strict.ftl", r#"{"email": "{{ contact.email }}"}"#)]);

    let (status, body) = post_json(
        app.router,
        "/api/transform/raw?template=strict.ftl",
        r#"{"customerId":"C1"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Rendering error"));
}

#[tokio::test]
async fn test_customer_absent_field_is_error() {
    let app = test_app(&[("id.ftl", r#"{"id": "{{ customerId }}"}"#)]);

    let (status, body) = post_json(
        app.router,
        "/api/transform/customer?template=id.ftl",
        "{}",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Rendering error"));
}

#[tokio::test]
async fn test_customer_null_field_is_error() {
    let app = test_app(&[(
        "name.ftl",
        r#"{"id": "{{ customerId }}", "first": "{{ personalInfo.firstName }}"}"#,
    )]);

    let (status, body) = post_json(
        app.router,
        "/api/transform/customer?template=name.ftl",
        r#"{"customerId":"C1","personalInfo":{"firstName":null,"lastName":"Lee"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Rendering error"));
}

#[tokio::test]
async fn test_raw_null_field_is_error() {
    let app = test_app(&[("x.ftl", r#"{"x": "{{ x }}"}"#)]);

    let (status, body) = post_json(
        app.router.clone(),
        "/api/transform/raw?template=x.ftl",
        r#"{"x": null}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Rendering error"));

    let (status, body) = post_json(
        app.router,
        "/api/transform/raw?template=x.ftl",
        r#"{"x": "value"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"x": "value"}));
}

#[tokio::test]
async fn test_output_must_be_object() {
    let app = test_app(&[("array.ftl", "[1, 2]"), ("number.ftl", "42")]);

    for (template, kind) in [("array.ftl", "an array"), ("number.ftl", "a number")] {
        let (status, body) = post_json(
            app.router.clone(),
            &format!("/api/transform/raw?template={template}"),
            "{}",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": format!("Rendered output is not a JSON object: got {kind}")})
        );
    }

    let (status, _) = post_json(
        app.router,
        "/api/transform/customer?template=array.ftl",
        "{}",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_template_syntax_error() {
    let app = test_app(&[("broken.ftl", r#"{"a": "{{ customerId "}"#)]);

    let (status, body) = post_json(
        app.router,
        "/api/transform/raw?template=broken.ftl",
        r#"{"customerId":"C1"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Template syntax error"));
}

#[tokio::test]
async fn test_output_not_valid_json() {
    let app = test_app(&[("plain.ftl", "Hello {{ customerId }}")]);

    let (status, body) = post_json(
        app.router,
        "/api/transform/raw?template=plain.ftl",
        r#"{"customerId":"C1"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Rendered output is not valid JSON"));
}

#[tokio::test]
async fn test_transform_is_idempotent() {
    let app = test_app(&[("customer-transform.ftl", CUSTOMER_TEMPLATE)]);
    let input = r#"{"customerId":"C7","personalInfo":{"firstName":"Bo","lastName":"Park"},"accounts":[],"preferences":{"emailNotifications":false,"preferredLanguage":"ko"}}"#;

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let request = Request::builder()
            .method("POST")
            .uri("/api/transform/customer")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(input))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        bodies.push(
            axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap(),
        );
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn test_health() {
    let app = test_app(&[("echo.ftl", ECHO_TEMPLATE)]);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["templates"]["available"], true);
    assert_eq!(body["templates"]["count"], 1);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = test_app(&[("echo.ftl", ECHO_TEMPLATE)]);

    let (status, _) = post_json(
        app.router.clone(),
        "/api/transform/raw?template=echo.ftl",
        r#"{"customerId":"C1","personalInfo":{"firstName":"A","lastName":"B"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("transform_rendered_total"));
}

#[tokio::test]
async fn test_shipped_customer_template() {
    let app = test_app(&[(
        "customer-transform.ftl",
        include_str!("../templates/customer-transform.ftl"),
    )]);

    let input = json!({
        "customerId": "C1",
        "personalInfo": {"firstName": "Ann", "lastName": "Lee", "email": "ann@example.com"},
        "accounts": [
            {"accountNumber": "ACC-1", "accountType": "checking", "balance": 10.5, "currency": "USD", "status": "active"},
            {"accountNumber": "ACC-2", "accountType": "savings", "balance": 0.25, "currency": "USD", "status": "closed"}
        ],
        "preferences": {"emailNotifications": true, "preferredLanguage": "en"}
    });

    let (status, body) = post_json(app.router, "/api/transform/customer", &input.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "C1");
    assert_eq!(body["name"], json!({"first": "Ann", "last": "Lee"}));
    assert_eq!(body["contact"]["phone"], Value::Null);
    assert_eq!(body["contact"]["channels"], json!({"email": true, "sms": false}));
    assert_eq!(body["accounts"][0]["active"], true);
    assert_eq!(body["accounts"][1]["active"], false);
    assert_eq!(body["accounts"][1]["balance"], 0.25);
}

#[tokio::test]
async fn test_shipped_customer_template_defaults() {
    let app = test_app(&[(
        "customer-transform.ftl",
        include_str!("../templates/customer-transform.ftl"),
    )]);

    let (status, body) = post_json(
        app.router.clone(),
        "/api/transform/customer",
        r#"{"customerId":"C2"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": "C2",
            "name": {"first": "", "last": ""},
            "contact": {
                "email": null,
                "phone": null,
                "language": "en",
                "channels": {"email": false, "sms": false}
            },
            "accounts": []
        })
    );

    let (status, _) = post_json(app.router, "/api/transform/customer", "{}").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
