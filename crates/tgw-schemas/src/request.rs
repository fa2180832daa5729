use serde::{Deserialize, Serialize};

use crate::{Direction, Exchange, Offset, OrderData, OrderType, Status};

/// Market-data subscription request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub symbol: String,
    pub exchange: Exchange,
}

impl SubscribeRequest {
    pub fn new(symbol: impl Into<String>, exchange: Exchange) -> Self {
        Self {
            symbol: symbol.into(),
            exchange,
        }
    }
}

/// Order entry request from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub exchange: Exchange,
    pub direction: Direction,
    pub order_type: OrderType,
    pub volume: i64,
    pub price: f64,
    pub offset: Offset,
    #[serde(default)]
    pub reference: String,
}

impl OrderRequest {
    /// Build the optimistic `Submitting` snapshot reported before the broker
    /// acknowledges the order.
    pub fn create_order_data(&self, orderid: impl Into<String>, gateway_name: &str) -> OrderData {
        OrderData {
            symbol: self.symbol.clone(),
            exchange: self.exchange,
            orderid: orderid.into(),
            order_type: self.order_type,
            direction: self.direction,
            offset: self.offset,
            price: self.price,
            volume: self.volume,
            traded: 0,
            status: Status::Submitting,
            datetime: None,
            reference: self.reference.clone(),
            gateway_name: gateway_name.to_string(),
        }
    }
}

/// Cancel request. `orderid` is the session-local id previously returned in
/// an [`OrderData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    pub orderid: String,
    pub symbol: String,
    pub exchange: Exchange,
}

/// Option exercise request. A second leg makes it a combination exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRequest {
    pub leg1_symbol: String,
    #[serde(default)]
    pub leg2_symbol: Option<String>,
    pub volume: i64,
}

/// Credentials and endpoints handed to `connect`.
///
/// **Secret fields are redacted in `Debug` output.**
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectSettings {
    pub user_id: String,
    pub password: String,
    /// Clearing/party id. Doubles as the broker id on the futures API.
    pub party_id: String,
    pub trade_address: String,
    pub md_address: String,
    pub app_id: String,
    pub auth_code: String,
    pub dev_code: String,
    pub dev_license: String,
    pub md_user: String,
    pub md_password: String,
}

impl std::fmt::Debug for ConnectSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |s: &String| if s.is_empty() { "" } else { "<REDACTED>" };
        f.debug_struct("ConnectSettings")
            .field("user_id", &self.user_id)
            .field("password", &redact(&self.password))
            .field("party_id", &self.party_id)
            .field("trade_address", &self.trade_address)
            .field("md_address", &self.md_address)
            .field("app_id", &self.app_id)
            .field("auth_code", &redact(&self.auth_code))
            .field("dev_code", &redact(&self.dev_code))
            .field("dev_license", &redact(&self.dev_license))
            .field("md_user", &self.md_user)
            .field("md_password", &redact(&self.md_password))
            .finish()
    }
}
