//! Server-Sent Events (SSE) relay.
//!
//! Upstream body chunks are forwarded to the outbound body one at a time, in
//! arrival order and byte-for-byte. Nothing is parsed, buffered or re-framed;
//! backpressure comes from the outbound body polling the upstream stream.

use axum::{
    body::{Body, Bytes},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use futures::stream::Stream;
use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

/// A pass-through stream that tracks relay progress and logs how it ended.
///
/// Dropping it before the upstream finished means the client went away.
pub struct RelayStream<S> {
    inner: S,
    request_id: String,
    chunks: usize,
    bytes: usize,
    finished: bool,
    started: Instant,
}

impl<S> RelayStream<S> {
    pub fn new(inner: S, request_id: String) -> Self {
        Self {
            inner,
            request_id,
            chunks: 0,
            bytes: 0,
            finished: false,
            started: Instant::now(),
        }
    }
}

impl<S, E> Stream for RelayStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(chunk))) => {
                self.chunks += 1;
                self.bytes += chunk.len();
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                self.finished = true;
                tracing::error!(
                    request_id = %self.request_id,
                    chunks = self.chunks,
                    bytes = self.bytes,
                    error = %e,
                    "Upstream stream failed, closing response"
                );
                Poll::Ready(Some(Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    e.to_string(),
                ))))
            }
            Poll::Ready(None) => {
                self.finished = true;
                tracing::debug!(
                    request_id = %self.request_id,
                    chunks = self.chunks,
                    bytes = self.bytes,
                    elapsed_ms = self.started.elapsed().as_millis() as u64,
                    "Stream relay completed"
                );
                Poll::Ready(None)
            }
        }
    }
}

impl<S> Drop for RelayStream<S> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::info!(
                request_id = %self.request_id,
                chunks = self.chunks,
                bytes = self.bytes,
                "Client disconnected before stream completed"
            );
        }
    }
}

/// Build the outbound event-stream response relaying `upstream`'s body.
pub fn relay_response(upstream: reqwest::Response, request_id: String) -> Response {
    let stream = RelayStream::new(Box::pin(upstream.bytes_stream()), request_id);
    event_stream_response(Body::from_stream(stream))
}

/// Wrap `body` in a 200 response with event-stream headers.
pub fn event_stream_response(body: Body) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}
