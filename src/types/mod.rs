//! Response and request types for the Binance USDT-M futures API.
//!
//! ## Organization
//!
//! - [`enums`] — shared enumerations (order side, order type, time-in-force…)
//! - [`market`] — public market-data response records (§6.1, §6.4)
//! - [`user`] — user-data-stream events and the listen-key payload
//! - [`requests`] — typed request parameter builders
//!
//! All enums are re-exported at the module root via `pub use enums::*`.

pub mod enums;
pub mod market;
pub mod requests;
pub mod user;

pub use enums::*;
