//! Fixed-point L2 order-book storage (§3 "Order book (L2)").
//!
//! Prices are kept as `price × 10^precision` integers rather than `f64` so
//! that level lookup, removal and the crossed-book invariant check never
//! suffer floating-point equality drift. `precision` is the symbol's
//! `pricePrecision` from [`ExchangeInfo`](crate::types::market::ExchangeInfo).

use std::collections::BTreeMap;

use crate::json::PriceLevel;
use crate::types::market::OrderBookSnapshot;

/// Which side of the book a level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bid,
    Ask,
}

/// A reconstructed L2 order book for a single symbol.
///
/// Bids are kept keyed by descending price, asks by ascending price — the
/// iteration order of [`OrderBook::bids`] and [`OrderBook::asks`] always
/// walks best-price-first. A level whose quantity reaches zero is removed
/// entirely rather than kept as a zero-quantity entry (§3 "no zero-qty
/// levels").
#[derive(Debug, Clone)]
pub struct OrderBook {
    precision: u32,
    bids: BTreeMap<i64, f64>,
    asks: BTreeMap<i64, f64>,
    last_update_id: i64,
}

impl OrderBook {
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            last_update_id: 0,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn last_update_id(&self) -> i64 {
        self.last_update_id
    }

    /// `price × 10^precision`, rounded to the nearest integer — the fixed
    /// point key under which a level is stored.
    pub fn price_key(&self, price: f64) -> i64 {
        (price * 10f64.powi(self.precision as i32)).round() as i64
    }

    /// Replace the book wholesale with a REST snapshot (§4.5.1 step 4).
    pub fn load_snapshot(&mut self, snapshot: &OrderBookSnapshot) {
        self.bids.clear();
        self.asks.clear();
        for level in &snapshot.bids {
            self.set_level(Side::Bid, level);
        }
        for level in &snapshot.asks {
            self.set_level(Side::Ask, level);
        }
        self.last_update_id = snapshot.last_update_id;
    }

    /// Apply one diff-update level: a quantity of exactly zero deletes the
    /// level, any other quantity inserts or overwrites it (§3, §6.4 "b"/"a"
    /// fields).
    pub fn set_level(&mut self, side: Side, level: &PriceLevel) {
        let key = self.price_key(level.price);
        let map = match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        if level.qty == 0.0 {
            map.remove(&key);
        } else {
            map.insert(key, level.qty);
        }
    }

    /// Apply every bid and ask level of a diff update, then advance the
    /// cursor to `final_update_id`.
    pub fn apply_diff(&mut self, bids: &[PriceLevel], asks: &[PriceLevel], final_update_id: i64) {
        for level in bids {
            self.set_level(Side::Bid, level);
        }
        for level in asks {
            self.set_level(Side::Ask, level);
        }
        self.last_update_id = final_update_id;
    }

    /// Best (highest) bid, as `(price, qty)`.
    pub fn best_bid(&self) -> Option<(f64, f64)> {
        self.bids.iter().next_back().map(|(&k, &q)| (self.key_to_price(k), q))
    }

    /// Best (lowest) ask, as `(price, qty)`.
    pub fn best_ask(&self) -> Option<(f64, f64)> {
        self.asks.iter().next().map(|(&k, &q)| (self.key_to_price(k), q))
    }

    /// Bid levels, best price first (descending).
    pub fn bids(&self) -> impl DoubleEndedIterator<Item = (f64, f64)> + '_ {
        self.bids.iter().rev().map(|(&k, &q)| (self.key_to_price(k), q))
    }

    /// Ask levels, best price first (ascending).
    pub fn asks(&self) -> impl DoubleEndedIterator<Item = (f64, f64)> + '_ {
        self.asks.iter().map(|(&k, &q)| (self.key_to_price(k), q))
    }

    /// A book is crossed if its best bid is at or above its best ask — never
    /// true for a correctly reconstructed book, useful as a consistency
    /// check after a resync.
    pub fn is_crossed(&self) -> bool {
        match (self.bids.iter().next_back(), self.asks.iter().next()) {
            (Some((&bid_key, _)), Some((&ask_key, _))) => bid_key >= ask_key,
            _ => false,
        }
    }

    fn key_to_price(&self, key: i64) -> f64 {
        key as f64 / 10f64.powi(self.precision as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(price: f64, qty: f64) -> PriceLevel {
        PriceLevel { price, qty }
    }

    #[test]
    fn zero_qty_removes_level() {
        let mut book = OrderBook::new(2);
        book.set_level(Side::Bid, &level(100.00, 1.5));
        assert_eq!(book.best_bid(), Some((100.00, 1.5)));
        book.set_level(Side::Bid, &level(100.00, 0.0));
        assert_eq!(book.best_bid(), None);
    }

    #[test]
    fn bids_descend_asks_ascend() {
        let mut book = OrderBook::new(2);
        for p in [100.00, 100.50, 99.75] {
            book.set_level(Side::Bid, &level(p, 1.0));
        }
        for p in [101.00, 100.80, 101.50] {
            book.set_level(Side::Ask, &level(p, 1.0));
        }
        let bids: Vec<f64> = book.bids().map(|(p, _)| p).collect();
        let asks: Vec<f64> = book.asks().map(|(p, _)| p).collect();
        assert_eq!(bids, vec![100.50, 100.00, 99.75]);
        assert_eq!(asks, vec![100.80, 101.00, 101.50]);
    }

    #[test]
    fn fixed_point_key_avoids_float_dedup_bugs() {
        let book = OrderBook::new(2);
        assert_eq!(book.price_key(100.10), book.price_key(100.10));
        assert_ne!(book.price_key(100.10), book.price_key(100.11));
    }

    #[test]
    fn crossed_book_is_detected() {
        let mut book = OrderBook::new(2);
        book.set_level(Side::Bid, &level(100.00, 1.0));
        book.set_level(Side::Ask, &level(99.00, 1.0));
        assert!(book.is_crossed());
    }

    #[test]
    fn snapshot_replaces_book_and_sets_cursor() {
        let mut book = OrderBook::new(2);
        book.set_level(Side::Bid, &level(1.00, 1.0));
        let snapshot = OrderBookSnapshot {
            last_update_id: 42,
            event_time: 0,
            transaction_time: 0,
            bids: vec![level(50.00, 2.0)],
            asks: vec![level(51.00, 3.0)],
        };
        book.load_snapshot(&snapshot);
        assert_eq!(book.best_bid(), Some((50.00, 2.0)));
        assert_eq!(book.last_update_id(), 42);
    }
}
