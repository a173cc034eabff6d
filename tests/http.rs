//! HTTP integration tests.
//!
//! Starts an axum server over a temporary store and exercises it with reqwest.

use marble_maze::server::{self, SubmitResponse};
use marble_maze::storage::FileStorage;
use marble_maze::{EvictionScope, LeaderboardStore};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Bind to port 0 and return the base URL along with the directory that must
/// outlive the test. Reset over HTTP is allowed, as in development.
async fn start_server(capacity: usize) -> (String, TempDir) {
    start_server_with(capacity, true).await
}

async fn start_server_with(capacity: usize, allow_reset: bool) -> (String, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::new(
        FileStorage::new(dir.path().join("storage.json")),
        capacity,
        EvictionScope::Global,
    );
    let app = server::router(store, allow_reset);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), dir)
}

async fn submit(client: &reqwest::Client, base: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{base}/api/highscores"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_check() {
    let (base, _dir) = start_server(10).await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn submit_then_list() {
    let (base, _dir) = start_server(3).await;
    let client = reqwest::Client::new();

    for (name, time) in [("A", 10.0), ("B", 8.0), ("C", 9.0)] {
        let resp = submit(
            &client,
            &base,
            json!({ "playerName": name, "score": 100, "time": time, "level": 1 }),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body: SubmitResponse = resp.json().await.unwrap();
        assert!(body.qualified);
    }

    let resp = submit(
        &client,
        &base,
        json!({ "playerName": "E", "score": 100, "time": 12.0, "level": 1 }),
    )
    .await;
    let body: SubmitResponse = resp.json().await.unwrap();
    assert!(!body.qualified);

    let entries: Vec<Value> = client
        .get(format!("{base}/api/highscores"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = entries
        .iter()
        .map(|e| e["playerName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["B", "C", "A"]);
    assert_eq!(entries[0]["time"], 8.0);
    assert_eq!(entries[0]["level"], 1);
    assert_eq!(entries[0]["score"], 100);
    assert!(entries[0]["date"].is_string());

    let limited: Vec<Value> = client
        .get(format!("{base}/api/highscores?limit=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn list_filters_by_level() {
    let (base, _dir) = start_server(10).await;
    let client = reqwest::Client::new();
    for (name, level, time) in [("a", 1, 5.0), ("b", 2, 9.0), ("c", 2, 3.0), ("d", 3, 1.0)] {
        submit(
            &client,
            &base,
            json!({ "playerName": name, "score": 1, "time": time, "level": level }),
        )
        .await;
    }

    let entries: Vec<Value> = client
        .get(format!("{base}/api/highscores?level=2&limit=5"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = entries
        .iter()
        .map(|e| e["playerName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["c", "b"]);
}

#[tokio::test]
async fn bad_requests_are_client_errors() {
    let (base, _dir) = start_server(10).await;
    let client = reqwest::Client::new();

    let resp = submit(&client, &base, json!({ "playerName": "", "time": 3.0 })).await;
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base}/api/highscores"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(format!("{base}/api/highscores?level=two"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("level"));

    let resp = client
        .get(format!("{base}/api/highscores?limit=abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn stats_and_clear() {
    let (base, _dir) = start_server(10).await;
    let client = reqwest::Client::new();
    for (name, time) in [("A", 1.0), ("A", 2.0), ("B", 3.0)] {
        submit(
            &client,
            &base,
            json!({ "playerName": name, "score": 1, "time": time, "level": 1 }),
        )
        .await;
    }

    let stats: Value = client
        .get(format!("{base}/api/highscores/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats, json!({ "totalEntries": 3, "uniquePlayers": 2 }));

    let resp = client
        .delete(format!("{base}/api/highscores"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let entries: Vec<Value> = client
        .get(format!("{base}/api/highscores"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn reset_is_not_routed_in_production() {
    let (base, _dir) = start_server_with(10, false).await;
    let client = reqwest::Client::new();
    submit(
        &client,
        &base,
        json!({ "playerName": "A", "score": 1, "time": 1.0, "level": 1 }),
    )
    .await;

    let resp = client
        .delete(format!("{base}/api/highscores"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);

    let entries: Vec<Value> = client
        .get(format!("{base}/api/highscores"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
}
