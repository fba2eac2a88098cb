//! Integration tests for the HTTP API
//!
//! Each test spins up the real router on an ephemeral port with a
//! temporary store and drives it with a plain HTTP client against wiremock
//! category pages.

use pagemill::config::{Config, DatabaseConfig, ExtractConfig, FetchConfig, PipelineConfig};
use pagemill::server::{router, AppState};
use pagemill::storage::{CategoryStore, StorePool};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(db_path: &Path) -> Config {
    Config {
        fetch: FetchConfig {
            timeout_secs: 2,
            connect_timeout_secs: 2,
            user_agent: "pagemill-test/1.0".to_string(),
        },
        database: DatabaseConfig {
            path: db_path.to_string_lossy().into_owned(),
        },
        server: Default::default(),
        pipeline: PipelineConfig {
            max_in_flight: 5,
            thread_workers: 2,
            store_pool_size: 2,
        },
        extract: ExtractConfig {
            name_selector: "h2.category-title".to_string(),
            description_selector: "div.category-desc".to_string(),
        },
    }
}

/// Binds the API on an ephemeral port and returns its base URL
async fn spawn_api(config: Config) -> String {
    let db_path = Path::new(&config.database.path);
    CategoryStore::open(db_path).expect("store opens");
    let pool = StorePool::new(db_path, config.pipeline.store_pool_size as usize);
    let state = AppState::new(Arc::new(config), pool);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.expect("serve");
    });

    format!("http://{}", addr)
}

async fn mount_category_page(server: &MockServer, route: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    r#"<html><body>
                    <h2 class="category-title">{name}</h2>
                    <div class="category-desc"><p>Described.</p></div>
                    </body></html>"#
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Polls the task endpoint until it reports a terminal status
async fn poll_until_terminal(client: &reqwest::Client, base: &str, task_id: &str) -> serde_json::Value {
    for _ in 0..100 {
        let body: serde_json::Value = client
            .get(format!("{}/tasks/{}", base, task_id))
            .send()
            .await
            .expect("poll request")
            .json()
            .await
            .expect("poll body");

        match body["status"].as_str() {
            Some("done") | Some("failed") => return body,
            _ => tokio::time::sleep(Duration::from_millis(50)).await,
        }
    }
    panic!("task never reached a terminal status");
}

#[tokio::test(flavor = "multi_thread")]
async fn submitted_batch_completes_and_reports_saved_count() {
    let pages = MockServer::start().await;
    mount_category_page(&pages, "/one", "First").await;
    mount_category_page(&pages, "/two", "Second").await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("api.db");
    let base = spawn_api(test_config(&db_path)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/parse_async", base))
        .json(&serde_json::json!({
            "urls": [format!("{}/one", pages.uri()), format!("{}/two", pages.uri())]
        }))
        .send()
        .await
        .expect("submit request");

    assert_eq!(response.status(), 202);
    let body: serde_json::Value = response.json().await.expect("submit body");
    assert_eq!(body["status"], "queued");
    let task_id = body["task_id"].as_str().expect("task id").to_string();

    let terminal = poll_until_terminal(&client, &base, &task_id).await;
    assert_eq!(terminal["status"], "done");
    assert_eq!(terminal["result"]["saved"], 2);
    assert!(terminal["result"]["elapsed_sec"].as_f64().is_some());

    let store = CategoryStore::open(&db_path).unwrap();
    assert_eq!(store.count().unwrap(), 2);
    assert!(store.get_by_name("First").unwrap().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_batch_is_rejected_without_creating_a_job() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_api(test_config(&dir.path().join("api.db"))).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/parse_async", base))
        .json(&serde_json::json!({"urls": []}))
        .send()
        .await
        .expect("submit request");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_batch_reports_failed_with_cause() {
    let pages = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&pages)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base = spawn_api(test_config(&dir.path().join("api.db"))).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/parse_async", base))
        .json(&serde_json::json!({"urls": [format!("{}/broken", pages.uri())]}))
        .send()
        .await
        .expect("submit request");
    assert_eq!(response.status(), 202);
    let body: serde_json::Value = response.json().await.expect("submit body");
    let task_id = body["task_id"].as_str().expect("task id").to_string();

    let terminal = poll_until_terminal(&client, &base, &task_id).await;
    assert_eq!(terminal["status"], "failed");
    assert!(terminal["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_api(test_config(&dir.path().join("api.db"))).await;
    let client = reqwest::Client::new();

    // Not a UUID at all.
    let response = client
        .get(format!("{}/tasks/nonexistent-id", base))
        .send()
        .await
        .expect("poll request");
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert_eq!(body["error"], "task not found");

    // A well-formed UUID the queue never issued.
    let response = client
        .get(format!("{}/tasks/{}", base, uuid::Uuid::new_v4()))
        .send()
        .await
        .expect("poll request");
    assert_eq!(response.status(), 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn synchronous_parse_blocks_and_returns_report() {
    let pages = MockServer::start().await;
    mount_category_page(&pages, "/solo", "Solo Category").await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("api.db");
    let base = spawn_api(test_config(&db_path)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/parse", base))
        .json(&serde_json::json!({"urls": [format!("{}/solo", pages.uri())]}))
        .send()
        .await
        .expect("parse request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("parse body");
    assert_eq!(body["saved"], 1);
    assert!(body["elapsed_sec"].as_f64().is_some());

    let store = CategoryStore::open(&db_path).unwrap();
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn synchronous_parse_rejects_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_api(test_config(&dir.path().join("api.db"))).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/parse", base))
        .json(&serde_json::json!({"urls": []}))
        .send()
        .await
        .expect("parse request");

    assert_eq!(response.status(), 400);
}
