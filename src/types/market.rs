//! Public market-data response records (§6.4).

use serde::Deserialize;

use crate::json::{price_levels, str_or_num_f64, PriceLevel};

/// `GET /fapi/v1/exchangeInfo` (§6.1).
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
}

/// Per-symbol metadata, principally `price_precision` for fixed-point book
/// keys (§3 "Order book (L2)").
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(rename = "pricePrecision")]
    pub price_precision: u32,
    #[serde(rename = "quantityPrecision", default)]
    pub quantity_precision: u32,
}

/// A single candle. Binance ships klines as a positional JSON array rather
/// than an object, so this type decodes by array index instead of by key
/// (§4.2 "array-shaped payloads... walk positional entries").
#[derive(Debug, Clone, PartialEq)]
pub struct Kline {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
    pub quote_volume: f64,
    pub trade_count: i64,
    pub taker_buy_base_volume: f64,
    pub taker_buy_quote_volume: f64,
}

impl<'de> Deserialize<'de> for Kline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Row(
            i64,
            #[serde(deserialize_with = "str_or_num_f64")] f64,
            #[serde(deserialize_with = "str_or_num_f64")] f64,
            #[serde(deserialize_with = "str_or_num_f64")] f64,
            #[serde(deserialize_with = "str_or_num_f64")] f64,
            #[serde(deserialize_with = "str_or_num_f64")] f64,
            i64,
            #[serde(deserialize_with = "str_or_num_f64")] f64,
            i64,
            #[serde(deserialize_with = "str_or_num_f64")] f64,
            #[serde(deserialize_with = "str_or_num_f64")] f64,
            serde_json::Value, // ignored trailer field
        );
        let Row(open_time, open, high, low, close, volume, close_time, quote_volume, trade_count, taker_buy_base_volume, taker_buy_quote_volume, _) =
            Row::deserialize(deserializer)?;
        Ok(Kline {
            open_time,
            open,
            high,
            low,
            close,
            volume,
            close_time,
            quote_volume,
            trade_count,
            taker_buy_base_volume,
            taker_buy_quote_volume,
        })
    }
}

/// `<symbol>@bookTicker` stream event (u, T, E, s, b, B, a, A per §6.4).
#[derive(Debug, Clone, Deserialize)]
pub struct BookTickerEvent {
    #[serde(rename = "u")]
    pub update_id: i64,
    #[serde(rename = "T")]
    pub transaction_time: i64,
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "b", deserialize_with = "str_or_num_f64")]
    pub best_bid_price: f64,
    #[serde(rename = "B", deserialize_with = "str_or_num_f64")]
    pub best_bid_qty: f64,
    #[serde(rename = "a", deserialize_with = "str_or_num_f64")]
    pub best_ask_price: f64,
    #[serde(rename = "A", deserialize_with = "str_or_num_f64")]
    pub best_ask_qty: f64,
}

/// `<symbol>@depth` / `<symbol>@depth<levels>` stream event (§3, §4.5.1,
/// §6.4: e, s, E, T, U, u, pu, b, a).
#[derive(Debug, Clone, Deserialize)]
pub struct DepthUpdateEvent {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "T")]
    pub transaction_time: i64,
    /// First update id in this event.
    #[serde(rename = "U")]
    pub first_update_id: i64,
    /// Final update id in this event — the sequence cursor (§3).
    #[serde(rename = "u")]
    pub final_update_id: i64,
    /// Final update id of the *previous* event — the "pu" chain rule (§3).
    #[serde(rename = "pu")]
    pub prev_final_update_id: i64,
    #[serde(rename = "b", deserialize_with = "price_levels")]
    pub bids: Vec<PriceLevel>,
    #[serde(rename = "a", deserialize_with = "price_levels")]
    pub asks: Vec<PriceLevel>,
}

/// `GET /fapi/v1/depth` REST order book snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookSnapshot {
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: i64,
    #[serde(rename = "E", default)]
    pub event_time: i64,
    #[serde(rename = "T", default)]
    pub transaction_time: i64,
    #[serde(deserialize_with = "price_levels")]
    pub bids: Vec<PriceLevel>,
    #[serde(deserialize_with = "price_levels")]
    pub asks: Vec<PriceLevel>,
}

/// `<symbol>@markPrice` stream event / `GET /fapi/v1/premiumIndex` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkPriceEvent {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "E", default)]
    pub event_time: i64,
    #[serde(rename = "p", deserialize_with = "str_or_num_f64")]
    pub mark_price: f64,
    #[serde(rename = "i", deserialize_with = "str_or_num_f64", default)]
    pub index_price: f64,
    #[serde(rename = "r", deserialize_with = "str_or_num_f64", default)]
    pub funding_rate: f64,
    #[serde(rename = "T", default)]
    pub next_funding_time: i64,
}

/// `<symbol>@miniTicker` stream event.
#[derive(Debug, Clone, Deserialize)]
pub struct MiniTickerEvent {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "E", default)]
    pub event_time: i64,
    #[serde(rename = "c", deserialize_with = "str_or_num_f64")]
    pub close: f64,
    #[serde(rename = "o", deserialize_with = "str_or_num_f64")]
    pub open: f64,
    #[serde(rename = "h", deserialize_with = "str_or_num_f64")]
    pub high: f64,
    #[serde(rename = "l", deserialize_with = "str_or_num_f64")]
    pub low: f64,
    #[serde(rename = "v", deserialize_with = "str_or_num_f64")]
    pub volume: f64,
    #[serde(rename = "q", deserialize_with = "str_or_num_f64")]
    pub quote_volume: f64,
}

/// `<symbol>@ticker` stream event (24hr rolling statistics).
#[derive(Debug, Clone, Deserialize)]
pub struct TickerEvent {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "E", default)]
    pub event_time: i64,
    #[serde(rename = "p", deserialize_with = "str_or_num_f64")]
    pub price_change: f64,
    #[serde(rename = "P", deserialize_with = "str_or_num_f64")]
    pub price_change_percent: f64,
    #[serde(rename = "c", deserialize_with = "str_or_num_f64")]
    pub last_price: f64,
    #[serde(rename = "v", deserialize_with = "str_or_num_f64")]
    pub volume: f64,
    #[serde(rename = "q", deserialize_with = "str_or_num_f64")]
    pub quote_volume: f64,
}

/// `<symbol>@forceOrder` liquidation order stream event.
#[derive(Debug, Clone, Deserialize)]
pub struct LiquidationEvent {
    #[serde(rename = "E", default)]
    pub event_time: i64,
    #[serde(rename = "o")]
    pub order: LiquidationOrder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiquidationOrder {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "S")]
    pub side: super::enums::OrderSide,
    #[serde(rename = "q", deserialize_with = "str_or_num_f64")]
    pub orig_qty: f64,
    #[serde(rename = "p", deserialize_with = "str_or_num_f64")]
    pub price: f64,
    #[serde(rename = "ap", deserialize_with = "str_or_num_f64")]
    pub avg_price: f64,
    #[serde(rename = "z", deserialize_with = "str_or_num_f64")]
    pub filled_qty: f64,
    #[serde(rename = "T")]
    pub trade_time: i64,
}

/// `GET /fapi/v1/ticker/price` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    #[serde(deserialize_with = "str_or_num_f64")]
    pub price: f64,
}
