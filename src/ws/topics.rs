//! Topic-string builders for the public combined WebSocket streams (§6.3).
//!
//! Every builder lower-cases the symbol, matching the exchange's own stream
//! naming convention (`btcusdt@...`, never `BTCUSDT@...`).

/// `<symbol>@aggTrade`.
pub fn agg_trade(symbol: &str) -> String {
    format!("{}@aggTrade", symbol.to_lowercase())
}

/// `<symbol>@markPrice` at the default 3-second cadence, or
/// `<symbol>@markPrice@1s` when `fast` is set.
pub fn mark_price(symbol: &str, fast: bool) -> String {
    let symbol = symbol.to_lowercase();
    if fast {
        format!("{symbol}@markPrice@1s")
    } else {
        format!("{symbol}@markPrice")
    }
}

/// `!markPrice@arr` / `!markPrice@arr@1s`.
pub fn mark_price_all(fast: bool) -> String {
    if fast {
        "!markPrice@arr@1s".to_owned()
    } else {
        "!markPrice@arr".to_owned()
    }
}

/// `<symbol>@kline_<interval>`.
pub fn kline(symbol: &str, interval: &str) -> String {
    format!("{}@kline_{interval}", symbol.to_lowercase())
}

/// `<symbol>@miniTicker`.
pub fn mini_ticker(symbol: &str) -> String {
    format!("{}@miniTicker", symbol.to_lowercase())
}

/// `!miniTicker@arr`.
pub fn mini_ticker_all() -> String {
    "!miniTicker@arr".to_owned()
}

/// `<symbol>@ticker`.
pub fn ticker(symbol: &str) -> String {
    format!("{}@ticker", symbol.to_lowercase())
}

/// `!ticker@arr`.
pub fn ticker_all() -> String {
    "!ticker@arr".to_owned()
}

/// `<symbol>@bookTicker`.
pub fn book_ticker(symbol: &str) -> String {
    format!("{}@bookTicker", symbol.to_lowercase())
}

/// `!bookTicker`.
pub fn book_ticker_all() -> String {
    "!bookTicker".to_owned()
}

/// `<symbol>@forceOrder`.
pub fn liquidation(symbol: &str) -> String {
    format!("{}@forceOrder", symbol.to_lowercase())
}

/// `!forceOrder@arr`.
pub fn liquidation_all() -> String {
    "!forceOrder@arr".to_owned()
}

/// `<symbol>@depth<levels>` (partial book depth), optionally at the fast
/// 100ms cadence. `levels` must be one of 5, 10 or 20 (unchecked here — the
/// exchange rejects an invalid level on subscribe).
pub fn partial_book_depth(symbol: &str, levels: u32, fast: bool) -> String {
    let symbol = symbol.to_lowercase();
    if fast {
        format!("{symbol}@depth{levels}@100ms")
    } else {
        format!("{symbol}@depth{levels}")
    }
}

/// `<symbol>@depth` (diff depth updates), optionally at the fast 100ms
/// cadence (§4.5.1).
pub fn diff_book_depth(symbol: &str, fast: bool) -> String {
    let symbol = symbol.to_lowercase();
    if fast {
        format!("{symbol}@depth@100ms")
    } else {
        format!("{symbol}@depth")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_symbol() {
        assert_eq!(agg_trade("BTCUSDT"), "btcusdt@aggTrade");
        assert_eq!(book_ticker("ETHUSDT"), "ethusdt@bookTicker");
    }

    #[test]
    fn mark_price_cadence() {
        assert_eq!(mark_price("BTCUSDT", false), "btcusdt@markPrice");
        assert_eq!(mark_price("BTCUSDT", true), "btcusdt@markPrice@1s");
        assert_eq!(mark_price_all(false), "!markPrice@arr");
        assert_eq!(mark_price_all(true), "!markPrice@arr@1s");
    }

    #[test]
    fn kline_embeds_interval() {
        assert_eq!(kline("BTCUSDT", "1m"), "btcusdt@kline_1m");
    }

    #[test]
    fn depth_variants() {
        assert_eq!(partial_book_depth("BTCUSDT", 5, false), "btcusdt@depth5");
        assert_eq!(partial_book_depth("BTCUSDT", 20, true), "btcusdt@depth20@100ms");
        assert_eq!(diff_book_depth("BTCUSDT", false), "btcusdt@depth");
        assert_eq!(diff_book_depth("BTCUSDT", true), "btcusdt@depth@100ms");
    }

    #[test]
    fn array_and_singular_forms() {
        assert_eq!(mini_ticker_all(), "!miniTicker@arr");
        assert_eq!(ticker_all(), "!ticker@arr");
        assert_eq!(book_ticker_all(), "!bookTicker");
        assert_eq!(liquidation_all(), "!forceOrder@arr");
    }
}
