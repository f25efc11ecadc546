#![allow(missing_docs, unused_results)]

use std::time::Duration;

use etl_core::logging::capture_logs;
use etl_jobs::{JobError, RatesClient, run_rates_job};
use serde_json::json;
use tracing::Level;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_rates() -> serde_json::Value {
    json!({
        "refRates": [
            {"effectiveDate": "2026-10-16", "type": "EFFR", "percentRate": 4.33},
            {"effectiveDate": "2026-10-16", "type": "SOFR", "percentRate": 4.31}
        ]
    })
}

#[tokio::test]
async fn fetch_returns_parsed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rates/all/latest.json"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_rates()))
        .expect(1)
        .mount(&server)
        .await;

    let client = RatesClient::new();
    let data = client
        .fetch(&format!("{}/api/rates/all/latest.json", server.uri()))
        .await
        .unwrap();
    assert_eq!(data, sample_rates());
}

#[tokio::test]
async fn fetch_rejects_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = RatesClient::new().fetch(&server.uri()).await.unwrap_err();
    assert!(matches!(err, JobError::Http(_)));
}

#[tokio::test]
async fn fetch_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = RatesClient::new().fetch(&server.uri()).await.unwrap_err();
    assert!(matches!(err, JobError::Http(_)));
}

#[tokio::test]
async fn successful_job_writes_one_file_with_same_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_rates()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("file_watcher");
    let saved = run_rates_job(&RatesClient::new(), &server.uri(), &out, "ny_fed_rates")
        .await
        .unwrap()
        .unwrap();

    let entries: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(saved.parent(), Some(out.as_path()));

    let name = saved.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("ny_fed_rates_"));
    assert!(name.ends_with(".json"));

    let content = std::fs::read_to_string(&saved).unwrap();
    assert!(content.contains("\n    \"refRates\": ["));
    let written: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(written, sample_rates());
}

#[tokio::test]
async fn server_error_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("file_watcher");

    let (logs, _guard) = capture_logs();
    let saved = run_rates_job(&RatesClient::new(), &server.uri(), &out, "ny_fed_rates")
        .await
        .unwrap();

    assert!(saved.is_none());
    assert!(!out.exists());
    assert!(logs.has_event(Level::WARN, "failed to fetch rates data"));
}

#[tokio::test]
async fn timeout_is_a_skipped_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_rates())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = RatesClient::with_timeout(Duration::from_millis(100));
    let saved = run_rates_job(&client, &server.uri(), dir.path(), "ny_fed_rates")
        .await
        .unwrap();

    assert!(saved.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn unwritable_output_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_rates()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let err = run_rates_job(&RatesClient::new(), &server.uri(), &blocker, "ny_fed_rates")
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::CreateDir { .. }));
}
