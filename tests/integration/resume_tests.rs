//! Checkpoint and resume behavior across separate runs

use crate::common::{listing_path, mount_brand, mount_catalog, mount_failure, test_config};
use catalog_sweep::output::load_statistics;
use catalog_sweep::storage::{open_store, CheckpointStore};
use catalog_sweep::{run_crawl, Orchestrator};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BRANDS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

async fn mount_site(server: &MockServer) {
    mount_catalog(server, &BRANDS).await;
    for brand in BRANDS {
        let model = format!("{}1", brand);
        mount_brand(server, brand, &[&[model.as_str()]]).await;
    }
}

#[tokio::test]
async fn test_six_brands_in_batches_of_five() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_site(&server).await;

    let config = test_config(&server, dir.path(), 5);
    let summary = run_crawl(config.clone()).await.unwrap();

    assert_eq!(summary.committed_batches, vec![1, 2]);
    let store = open_store(&config.output).unwrap();
    assert_eq!(store.read(1).unwrap().len(), 5);
    assert_eq!(store.read(2).unwrap().brand_names().collect::<Vec<_>>(), vec!["F"]);
}

#[tokio::test]
async fn test_second_run_only_crawls_uncommitted_brands() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_failure(&server, &listing_path("F", 1), 503, 2).await;
    mount_site(&server).await;

    let config = test_config(&server, dir.path(), 5);
    let first = run_crawl(config.clone()).await.unwrap();
    assert_eq!(first.committed_batches, vec![1]);
    assert_eq!(first.unprocessed, vec!["F".to_string()]);
    server.verify().await;

    // Second run: F is reachable and committed brands are never requested
    server.reset().await;
    mount_catalog(&server, &BRANDS).await;
    mount_brand(&server, "F", &[&["F1"]]).await;
    Mock::given(method("GET"))
        .and(path(listing_path("A", 1)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let second = run_crawl(config.clone()).await.unwrap();

    assert_eq!(second.previously_committed, 5);
    assert_eq!(second.scheduled_brands, 1);
    assert_eq!(second.committed_batches, vec![2]);
    assert!(second.is_complete());

    let stats = load_statistics(&open_store(&config.output).unwrap()).unwrap();
    assert_eq!(stats.batches, 2);
    assert_eq!(stats.brands, 6);
    assert_eq!(stats.devices, 6);
}

#[tokio::test]
async fn test_stray_files_in_checkpoint_dir_are_ignored() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_site(&server).await;

    fs::write(dir.path().join(".tmpXYZ123"), "{ partial").unwrap();
    fs::write(dir.path().join("BrandsList_x.json"), "{}").unwrap();
    fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let config = test_config(&server, dir.path(), 10);
    let summary = run_crawl(config.clone()).await.unwrap();

    assert_eq!(summary.committed_batches, vec![1]);
    assert_eq!(summary.committed_brands, 6);
}

#[tokio::test]
async fn test_dry_run_plans_without_crawling() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_catalog(&server, &BRANDS).await;
    Mock::given(method("GET"))
        .and(path(listing_path("A", 1)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server, dir.path(), 4);
    let plan = Orchestrator::new(&config).unwrap().plan().await.unwrap();

    let sizes: Vec<(u64, usize)> = plan.iter().map(|b| (b.id, b.brands.len())).collect();
    assert_eq!(sizes, vec![(1, 4), (2, 2)]);
    assert!(open_store(&config.output).unwrap().list_existing().unwrap().is_empty());
}
