use super::*;
use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct CaptureState {
    tx: Arc<Mutex<Option<oneshot::Sender<HashMap<String, String>>>>>,
}

async fn handle_captured_fetch(
    State(state): State<CaptureState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(params);
    }
    Json(json!({ "results": [] }))
}

async fn spawn_fixed_server(status: StatusCode, body: Value) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    let app = Router::new().route("/api", get(move || async move { (status, Json(body)) }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api")
}

async fn spawn_capture_server() -> (String, oneshot::Receiver<HashMap<String, String>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    let (tx, rx) = oneshot::channel();
    let state = CaptureState {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/api", get(handle_captured_fetch))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/api"), rx)
}

fn sample_batch() -> Value {
    json!({
        "results": [
            {
                "gender": "male",
                "name": { "title": "Mr", "first": "Bob", "last": "Young" },
                "location": { "city": "Madrid", "country": "Spain" },
                "email": "a@x",
                "picture": { "thumbnail": "https://example.test/a.jpg" }
            },
            {
                "gender": "female",
                "name": { "title": "Ms", "first": "Amy", "last": "Zane" },
                "location": { "city": "Lima", "country": "Peru" },
                "email": "b@x",
                "picture": { "thumbnail": "https://example.test/b.jpg" }
            }
        ],
        "info": { "seed": "abc", "results": 2, "page": 1, "version": "1.4" }
    })
}

#[tokio::test]
async fn fetch_users_decodes_the_results_batch_in_order() {
    let endpoint = spawn_fixed_server(StatusCode::OK, sample_batch()).await;
    let client = DirectoryClient::new(&endpoint, 2).expect("client");

    let records = client.fetch_users().await.expect("fetch succeeds");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].email, "a@x");
    assert_eq!(records[0].name.first, "Bob");
    assert_eq!(records[0].location.country, "Spain");
    assert_eq!(records[1].email, "b@x");
    assert_eq!(records[1].picture.thumbnail, "https://example.test/b.jpg");
}

#[tokio::test]
async fn fetch_users_sends_the_configured_result_count() {
    let (endpoint, captured) = spawn_capture_server().await;
    let client = DirectoryClient::new(&endpoint, 25).expect("client");

    let records = client.fetch_users().await.expect("fetch succeeds");
    assert!(records.is_empty());

    let params = captured.await.expect("query captured");
    assert_eq!(params.get("results").map(String::as_str), Some("25"));
}

#[tokio::test]
async fn fetch_users_surfaces_non_success_statuses() {
    let endpoint =
        spawn_fixed_server(StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "down" })).await;
    let client = DirectoryClient::new(&endpoint, 10).expect("client");

    let err = client.fetch_users().await.expect_err("fetch fails");
    assert!(
        matches!(err, FetchError::Status { status } if status == StatusCode::SERVICE_UNAVAILABLE)
    );
}

#[tokio::test]
async fn fetch_users_rejects_a_body_without_results() {
    let endpoint = spawn_fixed_server(StatusCode::OK, json!({ "users": [] })).await;
    let client = DirectoryClient::new(&endpoint, 10).expect("client");

    let err = client.fetch_users().await.expect_err("decode fails");
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn fetch_users_maps_connection_failures_to_transport() {
    // Nothing listens here; bind-and-drop guarantees a closed port.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    drop(listener);

    let client = DirectoryClient::new(&format!("http://{addr}/api"), 10).expect("client");
    let err = client.fetch_users().await.expect_err("fetch fails");
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[test]
fn construction_rejects_an_invalid_endpoint() {
    let err = DirectoryClient::new("not a url", 10).expect_err("construction fails");
    assert!(matches!(err, FetchError::InvalidUrl { .. }));
}

#[tokio::test]
async fn fetch_thumbnail_returns_the_raw_bytes() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    let app = Router::new().route("/thumb.jpg", get(|| async { b"jpeg-bytes".to_vec() }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = DirectoryClient::new(DEFAULT_ENDPOINT, DEFAULT_RESULT_COUNT).expect("client");
    let bytes = client
        .fetch_thumbnail(&format!("http://{addr}/thumb.jpg"))
        .await
        .expect("thumbnail fetch succeeds");
    assert_eq!(bytes, b"jpeg-bytes".to_vec());
}

#[tokio::test]
async fn fetch_thumbnail_surfaces_non_success_statuses() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    let app = Router::new();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = DirectoryClient::new(DEFAULT_ENDPOINT, DEFAULT_RESULT_COUNT).expect("client");
    let err = client
        .fetch_thumbnail(&format!("http://{addr}/missing.jpg"))
        .await
        .expect_err("thumbnail fetch fails");
    assert!(matches!(err, FetchError::Status { status } if status == StatusCode::NOT_FOUND));
}
