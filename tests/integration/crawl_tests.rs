//! End-to-end crawls against a mock catalog
//!
//! These tests use wiremock to serve the catalog, listing and detail pages and
//! drive the real HTTP fetcher, HTML extractor and checkpoint store.

use crate::common::{
    detail_path, detail_title, listing_path, mount_brand, mount_catalog, mount_failure,
    test_config,
};
use catalog_sweep::state::DeviceStatus;
use catalog_sweep::storage::{open_store, CheckpointStore};
use catalog_sweep::{run_crawl, DeviceRecord, SweepError};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_crawl_commits_every_brand() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_catalog(&server, &["Apple", "Nokia", "Sony"]).await;
    mount_brand(&server, "Apple", &[&["A1", "A2"], &["A3"], &["A4"]]).await;
    mount_brand(&server, "Nokia", &[&["N1"]]).await;
    mount_brand(&server, "Sony", &[&["S1", "S2"]]).await;

    let config = test_config(&server, dir.path(), 5);
    let summary = run_crawl(config.clone()).await.expect("crawl failed");

    assert_eq!(summary.committed_batches, vec![1]);
    assert_eq!(summary.committed_brands, 3);
    assert_eq!(summary.device_records, 7);
    assert_eq!(summary.device_errors, 0);
    assert!(summary.is_complete());

    let store = open_store(&config.output).unwrap();
    let batch = store.read(1).unwrap();
    let models: Vec<&str> = batch.brands["Apple"].iter().map(|r| r.model.as_str()).collect();
    assert_eq!(models, vec!["A1", "A2", "A3", "A4"]);
    assert_eq!(
        batch.brands["Nokia"],
        vec![DeviceRecord::ok("N1", detail_title("Nokia", "N1"))]
    );

    assert!(dir.path().join("BrandsList_1.json").is_file());
}

#[tokio::test]
async fn test_permanent_device_failure_is_recorded() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Two attempts per URL with max-attempts = 2
    mount_failure(&server, &detail_path("B", "B2"), 500, 2).await;
    mount_catalog(&server, &["A", "B", "C"]).await;
    mount_brand(&server, "A", &[&["A1", "A2"]]).await;
    mount_brand(&server, "B", &[&["B1", "B2"]]).await;
    mount_brand(&server, "C", &[&["C1", "C2"]]).await;

    let config = test_config(&server, dir.path(), 5);
    let summary = run_crawl(config.clone()).await.unwrap();

    assert_eq!(summary.device_records, 6);
    assert_eq!(summary.device_errors, 1);
    assert!(summary.unprocessed.is_empty());

    let batch = open_store(&config.output).unwrap().read(1).unwrap();
    assert_eq!(batch.brand_names().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(batch.brands["B"][0], DeviceRecord::ok("B1", detail_title("B", "B1")));
    match &batch.brands["B"][1].status {
        DeviceStatus::Error(message) => assert!(message.contains("500"), "{}", message),
        other => panic!("expected an error record, got {:?}", other),
    }
}

#[tokio::test]
async fn test_retry_rotates_user_agent() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(detail_path("Acme", "X1")))
        .and(header("user-agent", "ua-1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    mount_catalog(&server, &["Acme"]).await;
    mount_brand(&server, "Acme", &[&["X1"]]).await;

    let config = test_config(&server, dir.path(), 5);
    let summary = run_crawl(config.clone()).await.unwrap();

    assert_eq!(summary.device_errors, 0);
    let batch = open_store(&config.output).unwrap().read(1).unwrap();
    assert_eq!(
        batch.brands["Acme"],
        vec![DeviceRecord::ok("X1", detail_title("Acme", "X1"))]
    );
}

#[tokio::test]
async fn test_requests_carry_accept_language() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Only the configured Accept-Language is answered
    Mock::given(method("GET"))
        .and(path("/devices/"))
        .and(header("accept-language", "en-GB"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<div class="manufacturer-group"><ul></ul></div>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, dir.path(), 5);
    let summary = run_crawl(config).await.unwrap();

    assert_eq!(summary.scheduled_brands, 0);
}

#[tokio::test]
async fn test_unreachable_catalog_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_failure(&server, "/devices/", 503, 2).await;

    let config = test_config(&server, dir.path(), 5);
    let result = run_crawl(config.clone()).await;

    match result {
        Err(SweepError::Discovery(failure)) => assert_eq!(failure.attempts, 2),
        other => panic!("expected discovery failure, got {:?}", other),
    }
    let store = open_store(&config.output).unwrap();
    assert!(store.list_existing().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_listing_leaves_brand_unprocessed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_failure(&server, &listing_path("Ghost", 1), 404, 2).await;
    mount_catalog(&server, &["Ghost", "Real"]).await;
    mount_brand(&server, "Real", &[&["R1"]]).await;

    let config = test_config(&server, dir.path(), 5);
    let summary = run_crawl(config.clone()).await.unwrap();

    assert_eq!(summary.committed_batches, vec![1]);
    assert_eq!(summary.unprocessed, vec!["Ghost".to_string()]);
    let batch = open_store(&config.output).unwrap().read(1).unwrap();
    assert_eq!(batch.brand_names().collect::<Vec<_>>(), vec!["Real"]);
}
