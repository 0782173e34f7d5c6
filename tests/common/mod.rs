//! Stub HTTP server the tests send requests to.
#![allow(dead_code)]

use axum::{
    extract::RawQuery,
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use flate2::{write::GzEncoder, Compression};
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;

fn header_str(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn posts() -> Json<Value> {
    let rows: Vec<Value> = (1..=12)
        .map(|i| json!({"userId": 1, "id": i, "title": format!("post {i}")}))
        .collect();
    Json(Value::Array(rows))
}

async fn object() -> Json<Value> {
    Json(json!({"id": 101, "title": "created"}))
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: String,
) -> Json<Value> {
    Json(json!([{
        "method": method.as_str(),
        "accept": header_str(&headers, "accept"),
        "x-trace": header_str(&headers, "x-trace"),
        "cookie": header_str(&headers, "cookie"),
        "content-type": header_str(&headers, "content-type"),
        "query": query.unwrap_or_default(),
        "body": body,
    }]))
}

async fn gzip() -> impl IntoResponse {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(br#"[{"name":"zipped","size":"3"}]"#)
        .unwrap();
    let compressed = encoder.finish().unwrap();
    (
        [
            (header::CONTENT_ENCODING, "gzip"),
            (header::CONTENT_TYPE, "application/json"),
        ],
        compressed,
    )
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!([]))
}

pub fn app() -> Router {
    Router::new()
        .route("/posts", get(posts))
        .route("/one", get(|| async { Json(json!([{"a": "1", "b": "2"}])) }))
        .route("/empty", get(|| async { Json(json!([])) }))
        .route("/object", get(object).post(object))
        .route("/text", get(|| async { "hello" }))
        .route(
            "/error",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))) }),
        )
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!([]))) }),
        )
        .route("/echo", get(echo).post(echo).put(echo).delete(echo))
        .route("/gzip", get(gzip))
        .route("/slow", get(slow))
}

/// Serves the stub app on the current runtime and returns its base URL.
pub async fn spawn() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app()).await.unwrap();
    });
    format!("http://{addr}")
}

/// Serves the stub app from a background thread, for tests without a runtime.
pub fn spawn_on_thread() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            axum::serve(listener, app()).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// A URL nothing listens on.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/posts")
}
