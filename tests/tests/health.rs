//! Health check, preflight, and stats endpoint tests.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};

/// The health probes share a process-wide registry, so the healthy and
/// unhealthy assertions run as one sequence instead of separate tests.
#[tokio::test]
async fn test_health_check_sequence() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // healthy, empty sheet
    let response = server.get("/").await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["message"], "服务正常运行");
    assert_eq!(body["totalRecords"], 0);
    assert_eq!(body["sheetName"], "测试表");
    assert!(body["timestamp"].as_str().is_some());

    server.get("/health/ready").await.assert_status(StatusCode::OK);
    server.get("/health/live").await.assert_status(StatusCode::OK);

    // totalRecords tracks the data rows, header excluded
    let payload = fixtures::array_payload(fixtures::scan_records(3));
    server
        .post("/")
        .content_type("application/json")
        .bytes(payload.into())
        .await
        .assert_status(StatusCode::OK);

    let body: serde_json::Value = server.get("/").await.json();
    assert_eq!(body["totalRecords"], 3);

    // unreadable sheet: error envelope and not-ready probe
    ctx.set_sheet_failure(true);
    let response = server.get("/").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "error");

    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    // liveness is about the process, not the store
    server.get("/health/live").await.assert_status(StatusCode::OK);

    // recovers once the store is reachable again
    ctx.set_sheet_failure(false);
    let body: serde_json::Value = server.get("/").await.json();
    assert_eq!(body["status"], "healthy");
    server.get("/health/ready").await.assert_status(StatusCode::OK);

    // same payload, JSONP encoding
    let response = server.get("/").add_query_param("callback", "ping").await;
    response.assert_status(StatusCode::OK);
    let text = response.text();
    assert!(text.starts_with("ping("));
    assert!(text.contains("\"healthy\""));
}

#[tokio::test]
async fn test_preflight_advertises_methods() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.method(axum::http::Method::OPTIONS, "/").await;

    response.assert_status(StatusCode::OK);
    let allow = response.header("access-control-allow-methods");
    let allow = allow.to_str().unwrap();
    assert!(allow.contains("GET"));
    assert!(allow.contains("POST"));
    assert!(allow.contains("OPTIONS"));
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_stats_tallies_by_carrier() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(vec![
        fixtures::scan_record("UPS", "U1"),
        fixtures::scan_record("UPS", "U2"),
        fixtures::scan_record("FedEx", "F1"),
    ]);
    server
        .post("/")
        .content_type("application/json")
        .bytes(payload.into())
        .await
        .assert_status(StatusCode::OK);

    let body: serde_json::Value = server.get("/stats").await.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["byType"]["UPS"], 2);
    assert_eq!(body["byType"]["FedEx"], 1);
}

#[tokio::test]
async fn test_stats_empty_sheet() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let body: serde_json::Value = server.get("/stats").await.json();
    assert_eq!(body["total"], 0);
    assert!(body["byType"].as_object().unwrap().is_empty());
}
