//! User-data stream response records (§6.4) and the listen-key REST payload.

use serde::Deserialize;

use crate::json::str_or_num_f64;
use crate::types::enums::{OrderSide, OrderStatus, OrderType, PositionSide, TimeInForce, WorkingType};

/// `POST|PUT /fapi/v1/listenKey` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenKeyResponse {
    #[serde(rename = "listenKey")]
    pub listen_key: String,
}

/// Envelope wrapping every user-data-stream event; `e` selects the variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "e")]
pub enum UserDataEvent {
    #[serde(rename = "ORDER_TRADE_UPDATE")]
    OrderTradeUpdate(OrderTradeUpdateEvent),
    #[serde(rename = "MARGIN_CALL")]
    MarginCall(MarginCallEvent),
    #[serde(rename = "listenKeyExpired")]
    ListenKeyExpired(ListenKeyExpiredEvent),
    #[serde(rename = "ACCOUNT_UPDATE")]
    AccountUpdate(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderTradeUpdateEvent {
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "T")]
    pub transaction_time: i64,
    #[serde(rename = "o")]
    pub order: UserOrderUpdate,
}

/// The order-update payload nested under `ORDER_TRADE_UPDATE.o`.
///
/// Binance's wire schema declares both an average-fill-price field and an
/// activation-price field (used only by trailing-stop orders) that differ
/// solely in letter case: `ap` and `AP`. They map to distinct, case-sensitive
/// fields here — `avg_price` (`ap`) and `activation_price` (`AP`,
/// `#[serde(default)]` since it is absent outside `TRAILING_STOP_MARKET`
/// orders) — rather than collapsing onto one member and losing whichever
/// was assigned second.
#[derive(Debug, Clone, Deserialize)]
pub struct UserOrderUpdate {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "c")]
    pub client_order_id: String,
    #[serde(rename = "S")]
    pub side: OrderSide,
    #[serde(rename = "o")]
    pub order_type: OrderType,
    #[serde(rename = "f")]
    pub time_in_force: TimeInForce,
    #[serde(rename = "q", deserialize_with = "str_or_num_f64")]
    pub orig_qty: f64,
    #[serde(rename = "p", deserialize_with = "str_or_num_f64")]
    pub orig_price: f64,
    #[serde(rename = "ap", deserialize_with = "str_or_num_f64")]
    pub avg_price: f64,
    #[serde(rename = "sp", deserialize_with = "str_or_num_f64", default)]
    pub stop_price: f64,
    #[serde(rename = "x")]
    pub execution_type: String,
    #[serde(rename = "X")]
    pub order_status: OrderStatus,
    #[serde(rename = "i")]
    pub order_id: i64,
    #[serde(rename = "l", deserialize_with = "str_or_num_f64")]
    pub last_filled_qty: f64,
    #[serde(rename = "z", deserialize_with = "str_or_num_f64")]
    pub cumulative_filled_qty: f64,
    #[serde(rename = "L", deserialize_with = "str_or_num_f64")]
    pub last_filled_price: f64,
    #[serde(rename = "T")]
    pub trade_time: i64,
    #[serde(rename = "t")]
    pub trade_id: i64,
    #[serde(rename = "wt")]
    pub working_type: WorkingType,
    #[serde(rename = "ps")]
    pub position_side: PositionSide,
    #[serde(rename = "AP", deserialize_with = "str_or_num_f64", default)]
    pub activation_price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarginCallEvent {
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "cw", deserialize_with = "str_or_num_f64", default)]
    pub cross_wallet_balance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListenKeyExpiredEvent {
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "listenKey")]
    pub listen_key: String,
}
