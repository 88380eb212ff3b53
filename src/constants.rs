//! Constants for the Binance USDT-M futures API.
//!
//! Contains base URLs, REST endpoint paths, and the timing constants that
//! govern the REST pipeline's keep-alive ping, rate-limit window, and
//! listen-key renewal cadence. These are used internally by
//! [`RestClient`](crate::client::RestClient) and the WebSocket stream types,
//! but are also exported for advanced usage.

// ---------------------------------------------------------------------------
// Base URLs
// ---------------------------------------------------------------------------

/// Base URL for the USDT-M futures REST API.
pub const REST_BASE_URL: &str = "https://fapi.binance.com";

/// Host for the USDT-M futures WebSocket streaming API.
pub const WS_HOST: &str = "fstream.binance.com";

/// User-Agent sent on the WebSocket handshake.
pub const VERSION_STRING: &str = concat!("binance-futures-rs/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// REST endpoint paths
// ---------------------------------------------------------------------------

pub const PATH_PING: &str = "/fapi/v1/ping";
pub const PATH_EXCHANGE_INFO: &str = "/fapi/v1/exchangeInfo";
pub const PATH_DEPTH: &str = "/fapi/v1/depth";
pub const PATH_KLINES: &str = "/fapi/v1/klines";
pub const PATH_PREMIUM_INDEX: &str = "/fapi/v1/premiumIndex";
pub const PATH_TICKER_PRICE: &str = "/fapi/v1/ticker/price";
pub const PATH_POSITION_SIDE_DUAL: &str = "/fapi/v1/positionSide/dual";
pub const PATH_ORDER: &str = "/fapi/v1/order";
pub const PATH_ALL_OPEN_ORDERS: &str = "/fapi/v1/allOpenOrders";
pub const PATH_OPEN_ORDER: &str = "/fapi/v1/openOrder";
pub const PATH_ALL_ORDERS: &str = "/fapi/v1/allOrders";
pub const PATH_LISTEN_KEY: &str = "/fapi/v1/listenKey";

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Per-request write/read deadline for the REST pipeline (§4.3).
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Idle keep-alive ping interval for the REST pipeline (§4.3).
pub const KEEPALIVE_PING_SECS: u64 = 15;

/// Listen-key renewal cadence; the exchange TTL is on the order of one hour,
/// renewal must happen strictly more often than that (§3, §8).
pub const LISTEN_KEY_RENEW_SECS: u64 = 59 * 60;

/// Default sliding-window size for the local rate-limit gate.
pub const DEFAULT_RATE_WINDOW_SECS: u64 = 1;
