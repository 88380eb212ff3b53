//! Typed request parameter builders.
//!
//! Unlike a typical JSON-body REST client, every Binance futures request —
//! whether GET, DELETE or a body-bearing POST/PUT — is carried as a
//! canonical `k=v&…` query (§4.1 "Body vs URL"). These builders exist to
//! give callers a typed surface instead of hand-assembling an [`ArgList`];
//! [`into_args`](PlaceOrderParams::into_args) is the only place request
//! bodies are produced.

use crate::args::ArgList;
use crate::types::enums::{OrderSide, OrderType, PositionSide, TimeInForce, WorkingType};

/// Parameters for `POST /fapi/v1/order` (place) and, with only `symbol` and
/// `order_id`/`orig_client_order_id` populated, `DELETE /fapi/v1/order`
/// (cancel).
#[derive(Debug, Clone, Default)]
pub struct PlaceOrderParams {
    pub symbol: String,
    pub side: Option<OrderSide>,
    pub position_side: Option<PositionSide>,
    pub order_type: Option<OrderType>,
    pub time_in_force: Option<TimeInForce>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub stop_price: Option<f64>,
    pub working_type: Option<WorkingType>,
    pub reduce_only: Option<bool>,
    pub close_position: Option<bool>,
    pub new_client_order_id: Option<String>,
}

impl PlaceOrderParams {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn into_args(self) -> ArgList {
        let mut args = ArgList::new();
        args.insert("symbol", self.symbol);
        if let Some(v) = self.side {
            args.insert("side", format!("{v:?}"));
        }
        if let Some(v) = self.position_side {
            args.insert("positionSide", format!("{v:?}"));
        }
        if let Some(v) = self.order_type {
            args.insert("type", format!("{v:?}"));
        }
        if let Some(v) = self.time_in_force {
            args.insert("timeInForce", format!("{v:?}"));
        }
        if let Some(v) = self.quantity {
            args.insert("quantity", v);
        }
        if let Some(v) = self.price {
            args.insert("price", v);
        }
        if let Some(v) = self.stop_price {
            args.insert("stopPrice", v);
        }
        if let Some(v) = self.working_type {
            args.insert("workingType", format!("{v:?}"));
        }
        if let Some(v) = self.reduce_only {
            args.insert("reduceOnly", v);
        }
        if let Some(v) = self.close_position {
            args.insert("closePosition", v);
        }
        if let Some(v) = self.new_client_order_id {
            args.insert("newClientOrderId", v);
        }
        args
    }
}

/// Parameters for `GET /fapi/v1/klines`.
#[derive(Debug, Clone)]
pub struct KlinesParams {
    pub symbol: String,
    pub interval: String,
    pub limit: Option<u32>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl KlinesParams {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            limit: None,
            start_time: None,
            end_time: None,
        }
    }

    pub fn into_args(self) -> ArgList {
        let mut args = ArgList::new();
        args.insert("symbol", self.symbol).insert("interval", self.interval);
        if let Some(v) = self.limit {
            args.insert("limit", v as u64);
        }
        if let Some(v) = self.start_time {
            args.insert("startTime", v);
        }
        if let Some(v) = self.end_time {
            args.insert("endTime", v);
        }
        args
    }
}
