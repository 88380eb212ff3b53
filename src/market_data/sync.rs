//! L2 depth-diff synchroniser (§4.5.1).
//!
//! Binance's diff-depth stream only carries *changes*; a consumer must seed
//! its book from a REST snapshot and splice the live diff stream onto it at
//! the right point. The six-step protocol:
//!
//! 1. Subscribe to `<symbol>@depth` (or `@depth@100ms`).
//! 2. While the subscription is warming up, buffer every diff event instead
//!    of applying it.
//! 3. Fetch a REST order-book snapshot.
//! 4. Sort the buffer ascending by `u` and discard events whose `u` is
//!    strictly below the snapshot's `lastUpdateId` — they are entirely
//!    covered by the snapshot already.
//! 5. If the earliest surviving event's `pu` is still above the snapshot's
//!    `lastUpdateId`, there is a gap the snapshot doesn't bridge: report the
//!    snapshot as stale and have the caller retry step 3. Otherwise, load
//!    the snapshot and apply every surviving buffered event in order.
//! 6. Thereafter, each live event must chain onto the last applied one via
//!    `pu == <previous event's u>` (§3); a mismatch means a gap was missed
//!    and forces a full resync back to step 1.

use crate::market_data::book::OrderBook;
use crate::types::market::{DepthUpdateEvent, OrderBookSnapshot};

/// Synchroniser lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No subscription yet; call [`DepthSynchronizer::begin_buffering`].
    Idle,
    /// Subscribed and buffering diffs while a snapshot is fetched.
    Buffering,
    /// Snapshot applied, buffered backlog replayed; steady-state cursor
    /// chaining is in effect.
    Synced,
}

/// Result of feeding one diff event to the synchroniser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Still warming up; the event was buffered, not applied.
    Buffered,
    /// Applied to the book.
    Applied,
    /// The event did not chain onto the last applied cursor (`pu` mismatch);
    /// the synchroniser has reset itself to [`SyncState::Idle`] and the
    /// caller must resubscribe and refetch a snapshot.
    GapDetected,
}

/// Drives one symbol's [`OrderBook`] through the snapshot-then-diff
/// synchronisation protocol.
pub struct DepthSynchronizer {
    book: OrderBook,
    state: SyncState,
    buffer: Vec<DepthUpdateEvent>,
}

impl DepthSynchronizer {
    pub fn new(precision: u32) -> Self {
        Self {
            book: OrderBook::new(precision),
            state: SyncState::Idle,
            buffer: Vec::new(),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Step 2: transition to buffering after subscribing to the diff stream.
    /// Clears any stale backlog from a previous attempt.
    pub fn begin_buffering(&mut self) {
        self.buffer.clear();
        self.state = SyncState::Buffering;
    }

    /// Feed one diff event. While [`SyncState::Buffering`] it is queued;
    /// once [`SyncState::Synced`] it is checked against the cursor chain and
    /// applied, or flagged as a gap.
    pub fn push_diff(&mut self, event: DepthUpdateEvent) -> SyncOutcome {
        match self.state {
            SyncState::Idle => {
                // Nothing to do with an event before a subscription exists;
                // treat it as buffered so callers have one outcome to match
                // on regardless of when the feed starts producing events.
                self.buffer.push(event);
                SyncOutcome::Buffered
            }
            SyncState::Buffering => {
                self.buffer.push(event);
                SyncOutcome::Buffered
            }
            SyncState::Synced => {
                if event.prev_final_update_id != self.book.last_update_id() {
                    self.state = SyncState::Idle;
                    self.buffer.clear();
                    return SyncOutcome::GapDetected;
                }
                self.book.apply_diff(&event.bids, &event.asks, event.final_update_id);
                SyncOutcome::Applied
            }
        }
    }

    /// Steps 3–5: apply a freshly fetched snapshot and replay the buffered
    /// backlog onto it. Returns `false` if the earliest surviving buffered
    /// event's `pu` chains to a point strictly after the snapshot's
    /// `lastUpdateId` — a gap the snapshot doesn't cover — in which case the
    /// caller should discard the snapshot and fetch a new one without
    /// clearing the buffer.
    pub fn apply_snapshot(&mut self, snapshot: OrderBookSnapshot) -> bool {
        self.buffer.sort_by_key(|ev| ev.final_update_id);
        // Step 4: drop anything already folded into the snapshot.
        self.buffer.retain(|ev| ev.final_update_id >= snapshot.last_update_id);

        if let Some(first) = self.buffer.first() {
            if first.prev_final_update_id > snapshot.last_update_id {
                return false;
            }
        }

        self.book.load_snapshot(&snapshot);
        for event in self.buffer.drain(..) {
            self.book.apply_diff(&event.bids, &event.asks, event.final_update_id);
        }
        self.state = SyncState::Synced;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::PriceLevel;

    fn diff(first: i64, last: i64, prev: i64) -> DepthUpdateEvent {
        DepthUpdateEvent {
            event_type: "depthUpdate".into(),
            symbol: "BTCUSDT".into(),
            event_time: 0,
            transaction_time: 0,
            first_update_id: first,
            final_update_id: last,
            prev_final_update_id: prev,
            bids: vec![PriceLevel { price: 100.0, qty: 1.0 }],
            asks: vec![],
        }
    }

    fn snapshot(last_update_id: i64) -> OrderBookSnapshot {
        OrderBookSnapshot {
            last_update_id,
            event_time: 0,
            transaction_time: 0,
            bids: vec![PriceLevel { price: 99.0, qty: 5.0 }],
            asks: vec![PriceLevel { price: 101.0, qty: 5.0 }],
        }
    }

    #[test]
    fn buffers_until_snapshot_applied() {
        let mut sync = DepthSynchronizer::new(2);
        sync.begin_buffering();
        assert_eq!(sync.push_diff(diff(101, 105, 100)), SyncOutcome::Buffered);
        assert_eq!(sync.state(), SyncState::Buffering);
    }

    #[test]
    fn snapshot_splices_at_the_right_event() {
        let mut sync = DepthSynchronizer::new(2);
        sync.begin_buffering();
        sync.push_diff(diff(80, 90, 79)); // strictly below the snapshot cursor, discarded
        sync.push_diff(diff(101, 105, 100));
        sync.push_diff(diff(106, 110, 105));
        assert!(sync.apply_snapshot(snapshot(100)));
        assert_eq!(sync.state(), SyncState::Synced);
        assert_eq!(sync.book().last_update_id(), 110);
    }

    /// §8 end-to-end scenario 2.
    #[test]
    fn end_to_end_scenario_reconciles_exactly() {
        let mut sync = DepthSynchronizer::new(2);
        sync.begin_buffering();
        sync.push_diff(DepthUpdateEvent {
            event_type: "depthUpdate".into(),
            symbol: "BTCUSDT".into(),
            event_time: 0,
            transaction_time: 0,
            first_update_id: 100,
            final_update_id: 100,
            prev_final_update_id: 99,
            bids: vec![PriceLevel { price: 10.0, qty: 2.0 }],
            asks: vec![],
        });
        sync.push_diff(DepthUpdateEvent {
            event_type: "depthUpdate".into(),
            symbol: "BTCUSDT".into(),
            event_time: 0,
            transaction_time: 0,
            first_update_id: 101,
            final_update_id: 101,
            prev_final_update_id: 100,
            bids: vec![],
            asks: vec![PriceLevel { price: 11.0, qty: 0.0 }],
        });
        sync.push_diff(DepthUpdateEvent {
            event_type: "depthUpdate".into(),
            symbol: "BTCUSDT".into(),
            event_time: 0,
            transaction_time: 0,
            first_update_id: 102,
            final_update_id: 102,
            prev_final_update_id: 101,
            bids: vec![],
            asks: vec![PriceLevel { price: 12.0, qty: 1.0 }],
        });

        let snapshot = OrderBookSnapshot {
            last_update_id: 100,
            event_time: 0,
            transaction_time: 0,
            bids: vec![PriceLevel { price: 10.0, qty: 1.0 }],
            asks: vec![PriceLevel { price: 11.0, qty: 1.0 }],
        };
        assert!(sync.apply_snapshot(snapshot));

        let bids: Vec<(f64, f64)> = sync.book().bids().collect();
        let asks: Vec<(f64, f64)> = sync.book().asks().collect();
        assert_eq!(bids, vec![(10.0, 2.0)]);
        assert_eq!(asks, vec![(12.0, 1.0)]);
        assert_eq!(sync.book().last_update_id(), 102);
    }

    #[test]
    fn stale_snapshot_is_rejected() {
        let mut sync = DepthSynchronizer::new(2);
        sync.begin_buffering();
        sync.push_diff(diff(200, 210, 199));
        assert!(!sync.apply_snapshot(snapshot(100)));
        assert_eq!(sync.state(), SyncState::Buffering);
    }

    #[test]
    fn pu_mismatch_triggers_gap_and_resets_to_idle() {
        let mut sync = DepthSynchronizer::new(2);
        sync.begin_buffering();
        sync.push_diff(diff(101, 105, 100));
        sync.apply_snapshot(snapshot(100));
        assert_eq!(sync.push_diff(diff(106, 110, 105)), SyncOutcome::Applied);
        // pu should have been 110, not 999 — gap.
        assert_eq!(sync.push_diff(diff(111, 115, 999)), SyncOutcome::GapDetected);
        assert_eq!(sync.state(), SyncState::Idle);
    }
}
