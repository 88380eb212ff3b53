//! # binance-futures-rs
//!
//! A Rust client library for the Binance USDT-M futures API: REST request
//! dispatch, WebSocket market/user-data streaming, listen-key lifecycle
//! management, and L2/L3 order-book reconstruction.
//!
//! ## Quick start
//!
//! ```no_run
//! use binance_futures_rs::client::RestClient;
//! use binance_futures_rs::credentials::Credentials;
//! use binance_futures_rs::security::SecurityClass;
//! use binance_futures_rs::args::ArgList;
//!
//! #[tokio::main]
//! async fn main() -> binance_futures_rs::error::Result<()> {
//!     let client = RestClient::new(Credentials::none());
//!     let _: serde_json::Value = client.get("/fapi/v1/ping", ArgList::new(), SecurityClass::Public).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod args;
pub mod client;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod json;
pub mod market_data;
pub mod security;
pub mod signing;
pub mod types;
pub mod ws;

/// Re-export the main client type at crate root for convenience.
pub use client::RestClient;
/// Re-export the error type and Result alias.
pub use error::{Error, Result};
