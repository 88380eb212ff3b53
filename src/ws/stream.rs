//! The combined WebSocket stream connection (C4, §4.4).
//!
//! Wraps a single `tokio-tungstenite` connection to either the anonymous
//! combined-stream endpoint (`wss://fstream.binance.com/ws`) or, when bound
//! to a listen key, the user-data-stream endpoint
//! (`wss://fstream.binance.com/ws/<listen_key>`). Subscriptions are managed
//! dynamically over the same connection via `SUBSCRIBE`/`UNSUBSCRIBE`
//! control messages (§4.4 "Control plane"), each carrying a monotonically
//! increasing `id` starting at 1 (§3).
//!
//! Ping frames are not answered by hand: `tokio-tungstenite` queues the
//! matching `Pong` internally and flushes it on the connection's own next
//! write, which is the same "handled automatically by tungstenite" behaviour
//! the REST pipeline's sibling modules rely on elsewhere in this crate.
//!
//! `connect`/`connect_with_listen_key` run the handshake to completion
//! before returning, so there is no window in which the caller could race a
//! `subscribe()` call against a `CONNECTING` socket. Instead, a caller who
//! wants subscriptions live the instant the socket opens builds up a
//! [`PendingSubscriptions`] queue beforehand and passes it in; it is drained,
//! in submission order, immediately after the handshake succeeds (§4.4
//! "when CONNECTING the message is enqueued and drained, in order, on
//! connect").

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::USER_AGENT;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::constants::{VERSION_STRING, WS_HOST};
use crate::error::{Error, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Serialize)]
struct ControlMessage<'a> {
    method: &'a str,
    params: &'a [String],
    id: u64,
}

/// One queued `SUBSCRIBE`/`UNSUBSCRIBE` call, submitted before a connection
/// exists to be sent (in submission order) the moment it does (§3
/// "Subscription state", §4.4, §8 "Subscription draining").
#[derive(Debug, Clone)]
enum PendingMessage {
    Subscribe(Vec<String>),
    Unsubscribe(Vec<String>),
}

/// Outbound queue accumulated while a [`FuturesWsStream`] is still
/// `CONNECTING`. Pass the populated queue to [`FuturesWsStream::connect`] or
/// [`FuturesWsStream::connect_with_listen_key`]; every entry is flushed over
/// the wire in the order it was queued, immediately after the handshake
/// completes and before either constructor returns.
#[derive(Debug, Clone, Default)]
pub struct PendingSubscriptions {
    queue: Vec<PendingMessage>,
}

impl PendingSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `SUBSCRIBE` call for `topics`.
    pub fn subscribe(&mut self, topics: Vec<String>) -> &mut Self {
        self.queue.push(PendingMessage::Subscribe(topics));
        self
    }

    /// Queue an `UNSUBSCRIBE` call for `topics`.
    pub fn unsubscribe(&mut self, topics: Vec<String>) -> &mut Self {
        self.queue.push(PendingMessage::Unsubscribe(topics));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// A connection to the combined futures WebSocket stream.
///
/// Implements [`Stream<Item = Result<Message>>`]; callers deserialize the
/// text payload of each [`Message::Text`] into the event type their
/// subscribed topics produce (§6.4).
pub struct FuturesWsStream {
    read: SplitStream<WsStream>,
    write: SplitSink<WsStream, Message>,
    next_id: AtomicU64,
}

impl FuturesWsStream {
    /// Connect to the anonymous combined-stream endpoint, draining `pending`
    /// onto the wire (in submission order) as soon as the socket opens. Pass
    /// [`PendingSubscriptions::new`] for a connection with no subscriptions
    /// queued yet.
    pub async fn connect(pending: PendingSubscriptions) -> Result<Self> {
        Self::connect_path("", pending).await
    }

    /// Connect to the user-data-stream endpoint bound to `listen_key`
    /// (§3, §4.5 "Listen-key lifecycle"), draining `pending` the same way as
    /// [`connect`](Self::connect).
    pub async fn connect_with_listen_key(listen_key: &str, pending: PendingSubscriptions) -> Result<Self> {
        Self::connect_path(&format!("/{listen_key}"), pending).await
    }

    async fn connect_path(suffix: &str, pending: PendingSubscriptions) -> Result<Self> {
        let url = format!("wss://{WS_HOST}/ws{suffix}");
        Self::connect_url(&url, pending).await
    }

    /// Handshake against an arbitrary `url` and drain `pending` onto it.
    /// Split out from [`connect_path`](Self::connect_path) so tests can
    /// point it at a local, unencrypted mock server instead of the real
    /// streaming host.
    async fn connect_url(url: &str, pending: PendingSubscriptions) -> Result<Self> {
        let mut request = url.into_client_request()?;
        request
            .headers_mut()
            .insert(USER_AGENT, HeaderValue::from_static(VERSION_STRING));

        let (ws, _response) = connect_async(request).await?;
        let (write, read) = ws.split();

        tracing::info!(url, "connected to futures WebSocket stream");

        let mut stream = Self {
            read,
            write,
            next_id: AtomicU64::new(1),
        };
        for message in pending.queue {
            match message {
                PendingMessage::Subscribe(topics) => {
                    stream.subscribe(&topics).await?;
                }
                PendingMessage::Unsubscribe(topics) => {
                    stream.unsubscribe(&topics).await?;
                }
            }
        }
        Ok(stream)
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Send a `SUBSCRIBE` control message for the given topics (§6.3 for
    /// topic-string construction) and return the request id used, so the
    /// caller can correlate the server's acknowledgement.
    pub async fn subscribe(&mut self, topics: &[String]) -> Result<u64> {
        self.send_control("SUBSCRIBE", topics).await
    }

    /// Send an `UNSUBSCRIBE` control message for the given topics.
    pub async fn unsubscribe(&mut self, topics: &[String]) -> Result<u64> {
        self.send_control("UNSUBSCRIBE", topics).await
    }

    async fn send_control(&mut self, method: &str, topics: &[String]) -> Result<u64> {
        use futures_util::SinkExt;

        let id = self.next_id();
        let msg = ControlMessage {
            method,
            params: topics,
            id,
        };
        let text = serde_json::to_string(&msg)?;
        self.write.send(Message::Text(text.into())).await?;
        Ok(id)
    }

    /// Close the connection cleanly.
    pub async fn close(mut self) -> Result<()> {
        use futures_util::SinkExt;
        self.write.send(Message::Close(None)).await?;
        Ok(())
    }
}

impl Stream for FuturesWsStream {
    type Item = Result<Message>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            return match self.read.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(Message::Ping(_)))) => continue,
                Poll::Ready(Some(Ok(Message::Close(_)))) => {
                    tracing::info!("futures WebSocket stream closed by server");
                    Poll::Ready(Some(Err(Error::Closed)))
                }
                Poll::Ready(Some(Ok(msg))) => Poll::Ready(Some(Ok(msg))),
                Poll::Ready(Some(Err(err))) => Poll::Ready(Some(Err(Error::WebSocket(err)))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// §8 "Subscription draining": subscriptions queued before the socket
    /// exists must hit the wire in exactly the order they were queued.
    #[tokio::test]
    async fn pending_subscriptions_drain_in_submission_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            let mut received = Vec::new();
            for _ in 0..3 {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => received.push(text.to_string()),
                    other => panic!("unexpected server-side read: {other:?}"),
                }
            }
            received
        });

        let mut pending = PendingSubscriptions::new();
        pending.subscribe(vec!["btcusdt@aggTrade".to_string()]);
        pending.subscribe(vec!["btcusdt@depth".to_string()]);
        pending.unsubscribe(vec!["btcusdt@aggTrade".to_string()]);

        let _client = FuturesWsStream::connect_url(&format!("ws://{addr}"), pending)
            .await
            .expect("handshake against local mock server failed");

        let received = server.await.expect("server task panicked");
        assert_eq!(received.len(), 3);
        assert!(received[0].contains("\"method\":\"SUBSCRIBE\"") && received[0].contains("aggTrade"));
        assert!(received[1].contains("\"method\":\"SUBSCRIBE\"") && received[1].contains("depth"));
        assert!(received[2].contains("\"method\":\"UNSUBSCRIBE\"") && received[2].contains("aggTrade"));
    }

    #[test]
    fn pending_subscriptions_queue_tracks_length() {
        let mut pending = PendingSubscriptions::new();
        assert!(pending.is_empty());
        pending.subscribe(vec!["btcusdt@bookTicker".to_string()]);
        pending.unsubscribe(vec!["btcusdt@bookTicker".to_string()]);
        assert_eq!(pending.len(), 2);
        assert!(!pending.is_empty());
    }
}
