//! Integration tests for the collector
//!
//! These tests read story URLs from a real SQLite file and fetch icons from
//! a wiremock server through the reqwest fetcher. Requests are pointed at the
//! mock server by rewriting host and port, so the full https → http fallback
//! chain is exercised against a plain HTTP listener.

use async_trait::async_trait;
use favicon_collector::config::FetchConfig;
use favicon_collector::crawler::{
    preview, FetchOrchestrator, FetchResult, HttpFetcher, IconFetcher, IconRequest,
};
use favicon_collector::registry::DedupRegistry;
use favicon_collector::source::{initialize_schema, ItemFilter, SqliteSource};
use favicon_collector::storage::FsIconStore;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sends every request to the local mock server, keeping scheme and path
struct LocalFetcher {
    inner: HttpFetcher,
    port: u16,
}

#[async_trait]
impl IconFetcher for LocalFetcher {
    async fn fetch(&self, request: &IconRequest) -> FetchResult {
        let mut url = request.url.clone();
        url.set_host(Some("127.0.0.1"))
            .expect("Failed to rewrite host");
        url.set_port(Some(self.port))
            .expect("Failed to rewrite port");

        self.inner
            .fetch(&IconRequest {
                url,
                origin: request.origin.clone(),
            })
            .await
    }
}

/// Creates an items database with `(url, score)` stories in id order
fn create_items_db(dir: &Path, stories: &[(&str, i64)]) -> std::path::PathBuf {
    let db_path = dir.join("items.db");
    let conn = Connection::open(&db_path).expect("Failed to create database");
    initialize_schema(&conn).expect("Failed to create schema");
    for (i, (url, score)) in stories.iter().enumerate() {
        conn.execute(
            "INSERT INTO items (id, type, \"by\", url, score) VALUES (?1, 'story', 'tester', ?2, ?3)",
            params![i as i64 + 1, url, score],
        )
        .expect("Failed to insert story");
    }
    db_path
}

fn load_registry(db_path: &Path) -> DedupRegistry {
    let source = SqliteSource::open(db_path).expect("Failed to open source");
    DedupRegistry::from_source(&source, &ItemFilter::default()).expect("Failed to scan source")
}

fn test_config(output_dir: &Path) -> FetchConfig {
    FetchConfig {
        output_dir: output_dir.to_path_buf(),
        parallelism: 4,
        request_timeout: 5,
        ..FetchConfig::default()
    }
}

fn orchestrator(config: FetchConfig, server: &MockServer) -> FetchOrchestrator {
    let fetcher = LocalFetcher {
        inner: HttpFetcher::new(&config).expect("Failed to build fetcher"),
        port: server.address().port(),
    };
    let store = FsIconStore::create(&config.output_dir).expect("Failed to create store");
    FetchOrchestrator::new(config, Arc::new(fetcher), Arc::new(store))
}

#[tokio::test]
async fn test_end_to_end_single_domain_with_fallbacks() {
    let mock_server = MockServer::start().await;

    // Primary path missing, alternate path serves a PNG
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .and(header("origin", "https://www2.example.com"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favicon.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"\x89PNG\r\n\x1a\nicon".to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = create_items_db(
        dir.path(),
        &[
            ("https://www2.example.com/a", 20),
            ("http://EXAMPLE.com/b", 15),
            ("http://other.org/c", 5),
        ],
    );
    let registry = load_registry(&db_path);

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.stats().rows, 2);
    assert_eq!(registry.stats().duplicates, 1);
    assert_eq!(registry.get("example.com"), Some("https://www2.example.com/a"));

    let output_dir = dir.path().join("store");
    let mut orchestrator = orchestrator(test_config(&output_dir), &mock_server);
    let report = orchestrator.run(&registry).await.expect("Run failed");

    assert_eq!(report.stats.entries, 1);
    assert_eq!(report.stats.duplicates, 1);
    assert_eq!(report.stats.planned, 1);
    assert_eq!(report.stats.succeeded, 1);
    assert_eq!(report.stats.failed, 0);
    // https → http on the primary path, then the alternate path on http
    assert_eq!(report.stats.resubmitted, 2);

    let saved = std::fs::read(output_dir.join("example.com.ico")).expect("Icon not written");
    assert_eq!(saved, b"\x89PNG\r\n\x1a\nicon");
}

#[tokio::test]
async fn test_server_error_is_terminal_after_downgrade() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = create_items_db(dir.path(), &[("https://broken.net/story", 50)]);
    let registry = load_registry(&db_path);

    let output_dir = dir.path().join("store");
    let mut orchestrator = orchestrator(test_config(&output_dir), &mock_server);
    let report = orchestrator.run(&registry).await.expect("Run failed");

    assert_eq!(report.stats.planned, 1);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.succeeded, 0);
    assert!(!output_dir.join("broken.net.ico").exists());

    // Only the plain http attempt reaches the server as an HTTP request
    let received = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.path(), "/favicon.ico");
}

#[tokio::test]
async fn test_html_response_writes_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_bytes(b"<html><body>image</body></html>".to_vec()),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = create_items_db(dir.path(), &[("https://landing.page/", 99)]);
    let registry = load_registry(&db_path);

    let output_dir = dir.path().join("store");
    let mut orchestrator = orchestrator(test_config(&output_dir), &mock_server);
    let report = orchestrator.run(&registry).await.expect("Run failed");

    assert_eq!(report.stats.succeeded, 0);
    assert_eq!(report.stats.failed, 0);
    assert_eq!(report.stats.dropped, 1);
    assert!(!output_dir.join("landing.page.ico").exists());
}

#[tokio::test]
async fn test_existing_icons_skipped_and_batches_drained() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/x-icon")
                .set_body_bytes(vec![0u8, 0, 1, 0]),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = create_items_db(
        dir.path(),
        &[
            ("https://one.com/", 20),
            ("https://two.com/", 20),
            ("https://www.three.com/", 20),
            ("https://four.com/", 20),
            ("https://five.com/", 20),
            ("https://six.com/", 20),
        ],
    );
    let registry = load_registry(&db_path);

    let output_dir = dir.path().join("store");
    std::fs::create_dir_all(&output_dir).unwrap();
    std::fs::write(output_dir.join("six.com.ico"), b"kept").unwrap();

    let config = FetchConfig {
        batch_size: 2,
        ..test_config(&output_dir)
    };
    let mut orchestrator = orchestrator(config, &mock_server);
    let report = orchestrator.run(&registry).await.expect("Run failed");

    assert_eq!(report.stats.skipped, 1);
    assert_eq!(report.stats.planned, 5);
    assert_eq!(report.stats.barriers, 2);
    assert_eq!(report.stats.succeeded, 5);
    assert_eq!(std::fs::read(output_dir.join("six.com.ico")).unwrap(), b"kept");
    assert!(output_dir.join("three.com.ico").exists());
}

#[test]
fn test_preview_from_database() {
    let dir = TempDir::new().unwrap();
    let db_path = create_items_db(
        dir.path(),
        &[("https://www.alpha.io/x", 40), ("https://beta.io/y", 40)],
    );
    let registry = load_registry(&db_path);

    let output_dir = dir.path().join("store");
    std::fs::create_dir_all(&output_dir).unwrap();
    std::fs::write(output_dir.join("beta.io.ico"), b"kept").unwrap();

    let plan = preview(&registry, &FsIconStore::new(&output_dir));
    assert_eq!(
        plan.planned,
        vec![(
            "alpha.io".to_string(),
            "https://www.alpha.io/favicon.ico".to_string()
        )]
    );
    assert_eq!(plan.skipped, vec!["beta.io".to_string()]);
}
