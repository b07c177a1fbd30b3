//! End-to-end streaming tests against a live local upstream.
//!
//! The upstream is a small axum server that emits SSE chunks with delays, so
//! the relay sees real incremental network reads rather than a single buffer.

use axum::{
    body::{Body, Bytes},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chat_relay::{
    api::{build_router, AppState},
    core::config::AppConfig,
};
use futures::StreamExt;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

/// Sets the flag when the upstream body stream is dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

async fn spawn_upstream(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Upstream that emits `chunks` with `delay` before each one, then ends.
fn finite_upstream(chunks: Vec<&'static str>, delay: Duration) -> Router {
    Router::new().route(
        "/v1/chat/completions",
        post(move || {
            let chunks = chunks.clone();
            async move {
                let stream = futures::stream::unfold(0usize, move |i| {
                    let chunks = chunks.clone();
                    async move {
                        let chunk = *chunks.get(i)?;
                        tokio::time::sleep(delay).await;
                        Some((Ok::<_, std::io::Error>(Bytes::from_static(chunk.as_bytes())), i + 1))
                    }
                });
                sse_response(Body::from_stream(stream))
            }
        }),
    )
}

/// Upstream that emits a tick forever and flags when its stream is dropped.
fn endless_upstream(dropped: Arc<AtomicBool>) -> Router {
    Router::new().route(
        "/v1/chat/completions",
        post(move || {
            let flag = DropFlag(dropped.clone());
            async move {
                let stream = futures::stream::unfold(flag, |flag| async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Some((Ok::<_, std::io::Error>(Bytes::from_static(b"data: tick\n\n")), flag))
                });
                sse_response(Body::from_stream(stream))
            }
        }),
    )
}

fn sse_response(body: Body) -> Response {
    ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
}

fn relay_app(upstream: SocketAddr) -> Router {
    let mut config = AppConfig::default();
    config.upstream.url = format!("http://{}/v1/chat/completions", upstream);
    config.upstream.api_key = Some("gsk_test".to_string());

    build_router(Arc::new(AppState::new(config, reqwest::Client::new()))).unwrap()
}

fn chat_request() -> Request<Body> {
    Request::builder()
        .uri("/api/chat")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"messages": [{"role": "user", "content": "Hi"}]}).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_relay_streams_incrementally_and_in_order() {
    let chunks = vec![
        "data: {\"choices\":[{\"delta\":{\"content\":\"One\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" two\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" three\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" four\"}}]}\n\n",
        "data: [DONE]\n\n",
    ];
    let expected: String = chunks.concat();
    let upstream = spawn_upstream(finite_upstream(chunks, Duration::from_millis(200))).await;

    let start = Instant::now();
    let response = relay_app(upstream).oneshot(chat_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

    let mut body = response.into_body().into_data_stream();
    let mut received = Vec::new();
    let mut first_chunk_at = None;
    while let Some(frame) = body.next().await {
        let frame = frame.unwrap();
        first_chunk_at.get_or_insert_with(|| start.elapsed());
        received.extend_from_slice(&frame);
    }

    assert_eq!(String::from_utf8(received).unwrap(), expected);
    // The whole upstream takes ~1s; the first chunk must arrive well before that.
    assert!(first_chunk_at.unwrap() < Duration::from_millis(800));
}

#[tokio::test]
async fn test_client_disconnect_releases_upstream() {
    let dropped = Arc::new(AtomicBool::new(false));
    let upstream = spawn_upstream(endless_upstream(dropped.clone())).await;

    let response = relay_app(upstream).oneshot(chat_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body().into_data_stream();
    let first = body.next().await.unwrap().unwrap();
    assert!(first.starts_with(b"data: tick"));

    drop(body);

    let deadline = Instant::now() + Duration::from_secs(5);
    while !dropped.load(Ordering::SeqCst) {
        assert!(
            Instant::now() < deadline,
            "upstream stream was not released after client disconnect"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
