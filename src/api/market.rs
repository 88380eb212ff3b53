//! Public market-data endpoints (§6.1).

use crate::args::ArgList;
use crate::client::RestClient;
use crate::constants;
use crate::error::Result;
use crate::market_data::L3Snapshot;
use crate::security::SecurityClass;
use crate::types::market::{ExchangeInfo, Kline, MarkPriceEvent, OrderBookSnapshot, TickerPrice};
use crate::types::requests::KlinesParams;

impl RestClient {
    /// `GET /fapi/v1/ping` — connectivity check, also used internally as the
    /// idle keep-alive probe (§4.3).
    pub async fn ping(&self) -> Result<()> {
        let _: serde_json::Value = self.get(constants::PATH_PING, ArgList::new(), SecurityClass::Public).await?;
        Ok(())
    }

    /// `GET /fapi/v1/exchangeInfo`.
    pub async fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.get(constants::PATH_EXCHANGE_INFO, ArgList::new(), SecurityClass::Public).await
    }

    /// `GET /fapi/v1/depth` order-book snapshot, used to seed the L2/L3
    /// synchroniser (§4.5.1).
    pub async fn depth(&self, symbol: &str, limit: Option<u32>) -> Result<OrderBookSnapshot> {
        let mut args = ArgList::new();
        args.insert("symbol", symbol.to_owned());
        if let Some(limit) = limit {
            args.insert("limit", limit as u64);
        }
        self.get(constants::PATH_DEPTH, args, SecurityClass::Public).await
    }

    /// Fetch a [`L3Snapshot`] to splice into an `L3Book` coming out of cold
    /// start (§4.5.2). There is no dedicated per-order snapshot endpoint, so
    /// this reuses [`depth`](Self::depth) and maps each aggregated level onto
    /// a synthetic resting order (see [`L3Snapshot::from_depth`]).
    pub async fn l3_snapshot(&self, symbol: &str, precision: u32, limit: Option<u32>) -> Result<L3Snapshot> {
        let depth = self.depth(symbol, limit).await?;
        Ok(L3Snapshot::from_depth(&depth, precision))
    }

    /// `GET /fapi/v1/klines`.
    pub async fn klines(&self, params: KlinesParams) -> Result<Vec<Kline>> {
        self.get(constants::PATH_KLINES, params.into_args(), SecurityClass::Public).await
    }

    /// `GET /fapi/v1/premiumIndex`.
    pub async fn premium_index(&self, symbol: &str) -> Result<MarkPriceEvent> {
        let mut args = ArgList::new();
        args.insert("symbol", symbol.to_owned());
        self.get(constants::PATH_PREMIUM_INDEX, args, SecurityClass::Public).await
    }

    /// `GET /fapi/v1/ticker/price`.
    pub async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice> {
        let mut args = ArgList::new();
        args.insert("symbol", symbol.to_owned());
        self.get(constants::PATH_TICKER_PRICE, args, SecurityClass::Public).await
    }
}
