use axum::body::Body;
use axum::http::{Method, Request, StatusCode};

mod common;

use common::setup;

#[tokio::test]
async fn can_check_health_endpoint() {
    let context = setup();

    let response = context.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "OK");
}

#[tokio::test]
async fn allows_configured_origin_with_htmx_headers_exposed() {
    let context = setup();

    let request = Request::builder()
        .uri("/htmx/messages")
        .header("origin", "http://localhost:5500")
        .body(Body::empty())
        .unwrap();
    let response = context.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response
            .headers
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("http://localhost:5500")
    );
    let exposed = response
        .headers
        .get("access-control-expose-headers")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(exposed.contains("hx-retarget"));
    assert!(exposed.contains("hx-reswap"));
}

#[tokio::test]
async fn does_not_allow_unknown_origin() {
    let context = setup();

    let request = Request::builder()
        .uri("/htmx/messages")
        .header("origin", "http://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = context.send(request).await;

    assert!(response.headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn answers_cors_preflight_for_put() {
    let context = setup();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/htmx/tasks/1")
        .header("origin", "http://127.0.0.1:5500")
        .header("access-control-request-method", "PUT")
        .header("access-control-request-headers", "hx-request,hx-target")
        .body(Body::empty())
        .unwrap();
    let response = context.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    let allowed_methods = response
        .headers
        .get("access-control-allow-methods")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(allowed_methods.contains("PUT"));
}

#[tokio::test]
async fn serves_openapi_document() {
    let context = setup();

    let response = context.get("/api-docs/openapi.json").await;

    assert_eq!(response.status, StatusCode::OK);
    let document = response.json();
    assert!(document["paths"]["/api/users/{id}"].is_object());
    assert!(document["paths"]["/api/tasks/{id}/toggle"]["put"].is_object());
}
