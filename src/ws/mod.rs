//! WebSocket streaming for the Binance USDT-M futures API (C4, §4.4).
//!
//! - [`stream`] — the combined-stream connection, subscribe/unsubscribe
//!   control plane, and auto-pong handling.
//! - [`topics`] — topic-string builders for every public stream (§6.3).

pub mod stream;
pub mod topics;

pub use stream::{FuturesWsStream, PendingSubscriptions};
