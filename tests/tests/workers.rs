//! Worker passes run against the same stores the router writes to.

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::NaiveDate;
use integration_tests::{fixtures, setup::TestContext};
use scanlog_worker::{BackupWorker, QuotaCounter, TrimWorker};

#[tokio::test]
async fn test_trim_after_ingest_keeps_most_recent() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for chunk in 0..3 {
        let records = (0..4)
            .map(|i| fixtures::scan_record("UPS", &format!("C{}-{}", chunk, i)))
            .collect();
        server
            .post("/")
            .content_type("application/json")
            .bytes(fixtures::array_payload(records).into())
            .await
            .assert_status(StatusCode::OK);
    }
    assert_eq!(ctx.row_count(), 12);

    let trimmer = TrimWorker::with_cap(ctx.sheet.clone(), 10);
    assert_eq!(trimmer.run().await.unwrap().deleted, 2);

    let rows = ctx.rows();
    assert_eq!(rows.len(), 10);
    // the two oldest rows of the first chunk are gone
    assert_eq!(rows[0].processed_code, "C0-2");
    assert_eq!(rows[9].processed_code, "C2-3");

    // second pass is a no-op
    assert_eq!(trimmer.run().await.unwrap().deleted, 0);
}

#[tokio::test]
async fn test_quota_counter_is_not_wired_to_ingest() {
    // Ingestion never consults or advances the daily counter; the quota
    // pass is invoked on its own schedule.
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(fixtures::scan_records(2));
    server
        .post("/")
        .content_type("application/json")
        .bytes(payload.into())
        .await
        .assert_status(StatusCode::OK);

    assert!(ctx.counters.entries().is_empty());

    let quota = QuotaCounter::new(ctx.counters.clone());
    let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let status = quota.record_invocation(day).await.unwrap();
    assert_eq!(status.execution_count, 1);
    assert_eq!(ctx.counters.entries().len(), 1);
}

#[tokio::test]
async fn test_backup_snapshots_ingested_rows() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::array_payload(vec![fixtures::scan_record("UPS", "BK1")]);
    server
        .post("/")
        .content_type("application/json")
        .bytes(payload.into())
        .await
        .assert_status(StatusCode::OK);

    let dir = tempfile::tempdir().unwrap();
    let backup = BackupWorker::new(ctx.sheet.clone(), dir.path());
    let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let result = backup.run(day).await.unwrap();

    assert_eq!(result.rows, 1);
    let contents = std::fs::read_to_string(&result.file).unwrap();
    assert!(contents.contains("BK1"));
    assert!(contents.lines().next().unwrap().contains("时间"));
}
