//! Account and trading endpoints (§6.1). Every method here dispatches a
//! TRADE- or USER_DATA-class request, so each stamps its own `timestamp`
//! before handing its arguments to [`RestClient`] — the signature attaches
//! downstream in [`RestClient::dispatch`](crate::client::RestClient).

use serde::Deserialize;

use crate::args::ArgList;
use crate::client::{now_millis, RestClient};
use crate::constants;
use crate::error::Result;
use crate::security::SecurityClass;
use crate::types::requests::PlaceOrderParams;

/// `POST|DELETE /fapi/v1/order` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: i64,
    pub symbol: String,
    pub status: String,
    #[serde(rename = "clientOrderId")]
    pub client_order_id: String,
}

/// `GET /fapi/v1/positionSide/dual` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionModeResponse {
    #[serde(rename = "dualSidePosition")]
    pub dual_side_position: bool,
}

impl RestClient {
    /// `GET /fapi/v1/positionSide/dual` (USER_DATA-signed).
    pub async fn position_mode(&self) -> Result<PositionModeResponse> {
        let mut args = ArgList::new();
        args.insert("timestamp", now_millis());
        self.get(constants::PATH_POSITION_SIDE_DUAL, args, SecurityClass::UserData).await
    }

    /// `POST /fapi/v1/positionSide/dual` (USER_DATA-signed).
    pub async fn set_position_mode(&self, dual_side_position: bool) -> Result<()> {
        let mut args = ArgList::new();
        args.insert("dualSidePosition", dual_side_position)
            .insert("timestamp", now_millis());
        let _: serde_json::Value = self.post(constants::PATH_POSITION_SIDE_DUAL, args, SecurityClass::UserData).await?;
        Ok(())
    }

    /// `POST /fapi/v1/order` (TRADE-signed).
    pub async fn place_order(&self, params: PlaceOrderParams) -> Result<OrderResponse> {
        let mut args = params.into_args();
        args.insert("timestamp", now_millis());
        self.post(constants::PATH_ORDER, args, SecurityClass::Trade).await
    }

    /// `DELETE /fapi/v1/order` (TRADE-signed).
    pub async fn cancel_order(&self, symbol: &str, order_id: i64) -> Result<OrderResponse> {
        let mut args = ArgList::new();
        args.insert("symbol", symbol.to_owned())
            .insert("orderId", order_id)
            .insert("timestamp", now_millis());
        self.delete(constants::PATH_ORDER, args, SecurityClass::Trade).await
    }

    /// `DELETE /fapi/v1/allOpenOrders` (TRADE-signed).
    pub async fn cancel_all_open_orders(&self, symbol: &str) -> Result<()> {
        let mut args = ArgList::new();
        args.insert("symbol", symbol.to_owned()).insert("timestamp", now_millis());
        let _: serde_json::Value = self.delete(constants::PATH_ALL_OPEN_ORDERS, args, SecurityClass::Trade).await?;
        Ok(())
    }

    /// `GET /fapi/v1/openOrder` (USER_DATA-signed).
    pub async fn get_open_order(&self, symbol: &str, order_id: i64) -> Result<OrderResponse> {
        let mut args = ArgList::new();
        args.insert("symbol", symbol.to_owned())
            .insert("orderId", order_id)
            .insert("timestamp", now_millis());
        self.get(constants::PATH_OPEN_ORDER, args, SecurityClass::UserData).await
    }

    /// `GET /fapi/v1/allOrders` (USER_DATA-signed).
    pub async fn get_all_orders(&self, symbol: &str, limit: Option<u32>) -> Result<Vec<OrderResponse>> {
        let mut args = ArgList::new();
        args.insert("symbol", symbol.to_owned());
        if let Some(limit) = limit {
            args.insert("limit", limit as u64);
        }
        args.insert("timestamp", now_millis());
        self.get(constants::PATH_ALL_ORDERS, args, SecurityClass::UserData).await
    }
}
