//! Property-based tests for the stream relay.
//!
//! These tests use proptest to verify that any chunk sequence passes through
//! the relay unchanged: same chunks, same order, same concatenated bytes.

use axum::body::{Body, Bytes};
use chat_relay::api::RelayStream;
use futures::{executor::block_on, StreamExt};
use proptest::prelude::*;

/// Generate a sequence of upstream chunks, including empty and non-UTF-8 ones
fn chunks_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..32)
}

fn upstream(chunks: &[Vec<u8>]) -> impl futures::Stream<Item = Result<Bytes, std::io::Error>> + Unpin {
    let items: Vec<Result<Bytes, std::io::Error>> = chunks
        .iter()
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    futures::stream::iter(items)
}

proptest! {
    /// Property: every chunk is relayed individually and in arrival order
    #[test]
    fn prop_relay_preserves_chunk_sequence(chunks in chunks_strategy()) {
        let relay = RelayStream::new(upstream(&chunks), "prop".to_string());
        let relayed: Vec<Vec<u8>> = block_on(
            relay.map(|item| item.unwrap().to_vec()).collect::<Vec<_>>()
        );

        prop_assert_eq!(relayed, chunks);
    }

    /// Property: the outbound body equals the concatenated upstream bytes
    #[test]
    fn prop_relay_body_equals_concatenation(chunks in chunks_strategy()) {
        let expected: Vec<u8> = chunks.concat();
        let body = Body::from_stream(RelayStream::new(upstream(&chunks), "prop".to_string()));
        let collected = block_on(axum::body::to_bytes(body, usize::MAX)).unwrap();

        prop_assert_eq!(collected.to_vec(), expected);
    }

    /// Property: nothing after an upstream error is relayed
    #[test]
    fn prop_relay_stops_at_first_error(
        chunks in chunks_strategy(),
        error_at in 0usize..32,
    ) {
        let error_at = error_at.min(chunks.len());
        let mut items: Vec<Result<Bytes, std::io::Error>> = chunks
            .iter()
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        items.insert(
            error_at,
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "upstream reset")),
        );

        let relay = RelayStream::new(futures::stream::iter(items), "prop".to_string());
        let relayed: Vec<Result<Bytes, std::io::Error>> = block_on(relay.collect::<Vec<_>>());

        prop_assert_eq!(relayed.len(), error_at + 1);
        prop_assert!(relayed[..error_at].iter().all(|r| r.is_ok()));
        prop_assert!(relayed[error_at].is_err());
    }
}
