//! Market-data engine (C5): order-book reconstruction and the listen-key
//! lifecycle that ties the REST pipeline (C3) and WebSocket stream (C4)
//! together.
//!
//! - [`book`] — fixed-point L2 order book storage.
//! - [`sync`] — the L2 depth-diff synchroniser (§4.5.1).
//! - [`l3`] — the optional L3 (per-order) book variant (§4.5.2).
//! - [`listen_key`] — acquire/renew/bind lifecycle manager (§3, §4.5).

pub mod book;
pub mod l3;
pub mod listen_key;
pub mod sync;

pub use book::OrderBook;
pub use l3::{L3Book, L3Event, L3EventKind, L3PushOutcome, L3Snapshot, L3SnapshotOrder, L3SyncState};
pub use sync::{DepthSynchronizer, SyncState};
