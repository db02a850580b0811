//! End-to-end ingest tests through the real router.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};

#[tokio::test]
async fn test_single_record_array_appends_one_row() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(vec![fixtures::scan_record(
        "UPS",
        "1Z999AA1234567890",
    )]);

    let response = server
        .post("/")
        .content_type("application/json")
        .bytes(payload.into())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "成功处理 1 条记录");
    assert_eq!(body["processed"], 1);
    assert_eq!(body["totalReceived"], 1);

    let rows = ctx.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].carrier, "UPS");
    assert_eq!(rows[0].processed_code, "1Z999AA1234567890");
    assert_eq!(rows[0].original_code, "");
    assert!(!rows[0].timestamp.is_empty());
}

#[tokio::test]
async fn test_single_object_treated_as_one_element_batch() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/")
        .content_type("application/json")
        .bytes(
            fixtures::scan_record_full("顺丰速运", "SF123456", "sf-123456")
                .to_string()
                .into(),
        )
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["processed"], 1);

    let rows = ctx.rows();
    assert_eq!(rows[0].carrier, "顺丰速运");
    assert_eq!(rows[0].original_code, "sf-123456");
}

#[tokio::test]
async fn test_batch_appends_exactly_processed_count() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(fixtures::scan_records(5));
    let response = server
        .post("/")
        .content_type("application/json")
        .bytes(payload.into())
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["processed"], 5);
    assert_eq!(body["totalReceived"], 5);
    assert_eq!(ctx.row_count(), 5);

    // input order preserved
    let rows = ctx.rows();
    assert_eq!(rows[0].processed_code, "1Z999AA1234567800");
    assert_eq!(rows[4].processed_code, "1Z999AA1234567804");
}

#[tokio::test]
async fn test_invalid_siblings_are_skipped_not_fatal() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(vec![
        fixtures::scan_record("UPS", "GOOD1"),
        serde_json::json!({"expressType": "UPS"}), // missing processedCode
        serde_json::json!({}),
        fixtures::scan_record("FedEx", "GOOD2"),
    ]);

    let response = server
        .post("/")
        .content_type("application/json")
        .bytes(payload.into())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["processed"], 2);
    assert_eq!(body["totalReceived"], 4);
    assert_eq!(ctx.row_count(), 2);
}

#[tokio::test]
async fn test_resubmitting_a_batch_appends_duplicates() {
    // No de-duplication key exists; repeat submissions append again.
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(vec![fixtures::scan_record("UPS", "DUP1")]);

    for _ in 0..2 {
        server
            .post("/")
            .content_type("application/json")
            .bytes(payload.clone().into())
            .await
            .assert_status(StatusCode::OK);
    }

    assert_eq!(ctx.row_count(), 2);
}

#[tokio::test]
async fn test_data_query_param_fallback_on_post() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(vec![fixtures::scan_record("UPS", "VIAQUERY")]);
    let response = server.post("/").add_query_param("data", payload).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.row_count(), 1);
    assert_eq!(ctx.rows()[0].processed_code, "VIAQUERY");
}

#[tokio::test]
async fn test_data_form_param_fallback_on_post() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(vec![fixtures::scan_record("UPS", "VIAFORM")]);
    let form_body = url_encode_form("data", &payload);

    let response = server
        .post("/")
        .content_type("application/x-www-form-urlencoded")
        .bytes(form_body.into())
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.rows()[0].processed_code, "VIAFORM");
}

#[tokio::test]
async fn test_get_with_data_param_ingests_jsonp() {
    // Script-tag transport can only GET; data rides in the query string.
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(vec![fixtures::scan_record("UPS", "VIAGET")]);
    let response = server
        .get("/")
        .add_query_param("callback", "handleScan")
        .add_query_param("data", payload)
        .await;

    response.assert_status(StatusCode::OK);
    let text = response.text();
    assert!(text.starts_with("handleScan("));
    assert!(text.ends_with(");"));
    assert!(text.contains("成功处理 1 条记录"));
    assert_eq!(ctx.row_count(), 1);
}

#[tokio::test]
async fn test_jsonp_response_content_type_is_script() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(vec![fixtures::scan_record("UPS", "JS1")]);
    let response = server
        .post("/")
        .add_query_param("callback", "cb")
        .content_type("application/json")
        .bytes(payload.into())
        .await;

    response.assert_status(StatusCode::OK);
    let content_type = response.header("content-type");
    assert!(content_type
        .to_str()
        .unwrap()
        .starts_with("application/javascript"));
}

fn url_encode_form(key: &str, value: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish()
}
