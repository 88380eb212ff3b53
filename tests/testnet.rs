//! Integration tests against the Binance USDT-M futures Testnet
//! (`https://testnet.binancefuture.com`).
//!
//! # Running
//!
//! These tests require real testnet credentials. Set the following
//! environment variables before running:
//!
//! ```sh
//! export BINANCE_API_KEY="your-testnet-key"
//! export BINANCE_API_SECRET="your-testnet-secret"
//! cargo test --test testnet -- --nocapture
//! ```
//!
//! Without these env vars, every test is silently skipped.
//!
//! # What is tested
//!
//! - **Public market data** — ping, exchange info, depth snapshot, klines
//! - **Account reads** — position mode (requires a signed, USER_DATA call)
//! - **Error handling** — a deliberately invalid signed request surfaces a
//!   typed `Error::Api` or `Error::HttpStatus`, not a panic

use binance_futures_rs::client::RestClient;
use binance_futures_rs::credentials::Credentials;
use binance_futures_rs::error::Error;
use binance_futures_rs::types::requests::KlinesParams;

const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

fn testnet_client() -> Option<RestClient> {
    let key = std::env::var("BINANCE_API_KEY").ok()?;
    let secret = std::env::var("BINANCE_API_SECRET").ok()?;
    if key.is_empty() || secret.is_empty() {
        return None;
    }
    Some(RestClient::with_base_url(Credentials::new(key, secret), TESTNET_BASE_URL))
}

macro_rules! require_client {
    () => {
        match testnet_client() {
            Some(c) => c,
            None => {
                eprintln!("skipped (BINANCE_API_KEY / BINANCE_API_SECRET not set)");
                return;
            }
        }
    };
}

#[tokio::test]
async fn ping_succeeds_unauthenticated() {
    let client = RestClient::with_base_url(Credentials::none(), TESTNET_BASE_URL);
    client.ping().await.expect("ping should succeed without credentials");
}

#[tokio::test]
async fn exchange_info_lists_symbols() {
    let client = RestClient::with_base_url(Credentials::none(), TESTNET_BASE_URL);
    let info = client.exchange_info().await.expect("exchange info request failed");
    assert!(!info.symbols.is_empty());
}

#[tokio::test]
async fn depth_snapshot_has_ordered_levels() {
    let client = RestClient::with_base_url(Credentials::none(), TESTNET_BASE_URL);
    let snapshot = client.depth("BTCUSDT", Some(5)).await.expect("depth request failed");
    assert!(!snapshot.bids.is_empty());
    assert!(!snapshot.asks.is_empty());
}

#[tokio::test]
async fn klines_decode_positional_rows() {
    let client = RestClient::with_base_url(Credentials::none(), TESTNET_BASE_URL);
    let params = KlinesParams::new("BTCUSDT", "1m");
    let klines = client.klines(params).await.expect("klines request failed");
    assert!(!klines.is_empty());
    assert!(klines[0].close_time > klines[0].open_time);
}

#[tokio::test]
async fn position_mode_requires_valid_signature() {
    let client = require_client!();
    let mode = client.position_mode().await.expect("signed position-mode request failed");
    // Either true or false is a legitimate account setting; this only
    // confirms the signed round-trip decoded successfully.
    let _ = mode.dual_side_position;
}

#[tokio::test]
async fn invalid_signature_surfaces_as_typed_error() {
    let client = RestClient::with_base_url(Credentials::new("bad-key", "bad-secret"), TESTNET_BASE_URL);
    let err = client.position_mode().await.expect_err("an invalid key/secret pair must not succeed");
    match err {
        Error::Api(_) | Error::HttpStatus { .. } => {}
        other => panic!("expected a structured API error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_credentials_fail_fast_without_dispatching() {
    let client = RestClient::with_base_url(Credentials::none(), TESTNET_BASE_URL);
    let err = client.position_mode().await.expect_err("an unauthenticated client must not dispatch a signed request");
    assert!(matches!(err, Error::MissingCredentials));
}
