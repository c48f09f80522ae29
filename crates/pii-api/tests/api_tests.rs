//! API Integration Tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pii_api::{create_router_for_testing, create_uninitialized_router_for_testing};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Helper to create a test request
fn create_json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the JSON body
async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn has_finding(json: &Value, pii_type: &str, pii_value: &str) -> bool {
    json["pii_detected"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["pii_type"] == pii_type && f["pii_value"] == pii_value)
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_readiness_check() {
    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ready"], true);
}

#[tokio::test]
async fn test_readiness_before_initialization() {
    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let (status, json) = send(create_uninitialized_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["analyzer_initialized"], false);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["uptime_seconds"].is_number());
    assert!(json["total_requests"].is_number());
    assert!(json["total_findings"].is_number());
}

#[tokio::test]
async fn test_openapi_document() {
    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/analyze-pii"].is_object());
}

// =============================================================================
// Analyze API Tests
// =============================================================================

#[tokio::test]
async fn test_analyze_aadhaar_and_pan() {
    let request = create_json_request(
        "POST",
        "/analyze-pii",
        Some(json!({
            "paragraph": "My Aadhaar number is 456700000786 and PAN is AKKJM7875665D"
        })),
    );
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json.get("error").is_none());
    assert!(has_finding(&json, "Aadhaar Number", "456700000786"));
    assert!(has_finding(&json, "PAN Number", "AKKJM7875665D"));
}

#[tokio::test]
async fn test_analyze_context_types() {
    let request = create_json_request(
        "POST",
        "/analyze-pii",
        Some(json!({
            "paragraph": "John applied with Passport K8812345. The Voter ID number is SYG882745586 \
                and the account number is 6356278255789. Call 9876543210."
        })),
    );
    let (_, json) = send(create_router_for_testing(), request).await;

    assert!(has_finding(&json, "name", "John"));
    assert!(has_finding(&json, "Passport Number", "K8812345"));
    assert!(has_finding(&json, "Voter ID Number", "SYG882745586"));
    assert!(has_finding(&json, "Account Number", "6356278255789"));
    assert!(has_finding(&json, "Mobile Number", "9876543210"));
}

#[tokio::test]
async fn test_analyze_empty_paragraph() {
    let request = create_json_request("POST", "/analyze-pii", Some(json!({ "paragraph": "" })));
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "pii_detected": [] }));
}

#[tokio::test]
async fn test_analyze_missing_paragraph() {
    let request = create_json_request("POST", "/analyze-pii", Some(json!({ "text": "hello" })));
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "error": "Missing 'paragraph' field in the request JSON." })
    );
}

#[tokio::test]
async fn test_analyze_invalid_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/analyze-pii")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_analyze_oversized_body() {
    // default body limit is 1MB
    let paragraph = "a".repeat(1_200_000);
    let request = create_json_request(
        "POST",
        "/analyze-pii",
        Some(json!({ "paragraph": paragraph })),
    );
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["error"].is_string());
    assert!(json.get("pii_detected").is_none());
}

#[tokio::test]
async fn test_analyze_non_string_paragraph() {
    let request = create_json_request("POST", "/analyze-pii", Some(json!({ "paragraph": 42 })));
    let (status, json) = send(create_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["error"], "'paragraph' must be a string.");
}

#[tokio::test]
async fn test_analyze_before_initialization() {
    let request = create_json_request(
        "POST",
        "/analyze-pii",
        Some(json!({ "paragraph": "PAN is AKKJM7875665D" })),
    );
    let (status, json) = send(create_uninitialized_router_for_testing(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["error"], "PII analyzer is not initialized");
}

#[tokio::test]
async fn test_analyze_is_idempotent() {
    let body = json!({ "paragraph": "Priya's PAN is AKKJM7875665D, mobile 9123456780" });

    let (_, first) = send(
        create_router_for_testing(),
        create_json_request("POST", "/analyze-pii", Some(body.clone())),
    )
    .await;
    let (_, second) = send(
        create_router_for_testing(),
        create_json_request("POST", "/analyze-pii", Some(body)),
    )
    .await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_analyze_response_not_cacheable() {
    let request = create_json_request("POST", "/analyze-pii", Some(json!({ "paragraph": "" })));
    let response = create_router_for_testing().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "no-store"
    );
}

#[tokio::test]
async fn test_analyze_wrong_method() {
    let request = Request::builder()
        .uri("/analyze-pii")
        .body(Body::empty())
        .unwrap();
    let response = create_router_for_testing().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
