//! Futures trading API payloads (CTP-style field set).

use serde::{Deserialize, Serialize};

use crate::{RspInfo, RspMeta};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticateField {
    pub user_id: String,
    pub broker_id: String,
    pub auth_code: String,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_product_info: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoginField {
    pub user_id: String,
    pub password: String,
    pub broker_id: String,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_product_info: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementInfoConfirmField {
    pub investor_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorField {
    pub broker_id: String,
    pub investor_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOrderField {
    pub instrument_id: String,
    pub exchange_id: String,
    pub limit_price: f64,
    pub volume_total_original: i64,
    pub order_price_type: char,
    pub direction: char,
    pub comb_offset_flag: char,
    pub order_ref: String,
    pub investor_id: String,
    pub user_id: String,
    pub broker_id: String,
    pub comb_hedge_flag: char,
    pub contingent_condition: char,
    pub force_close_reason: char,
    pub is_auto_suspend: i32,
    pub time_condition: char,
    pub volume_condition: char,
    pub min_volume: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOrderActionField {
    pub instrument_id: String,
    pub exchange_id: String,
    pub order_ref: String,
    pub front_id: i32,
    pub session_id: i32,
    pub action_flag: char,
    pub broker_id: String,
    pub investor_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputForQuoteField {
    pub instrument_id: String,
    pub exchange_id: String,
    pub for_quote_ref: String,
    pub broker_id: String,
    pub investor_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum FuturesRequest {
    Authenticate(AuthenticateField),
    UserLogin(UserLoginField),
    SettlementInfoConfirm(SettlementInfoConfirmField),
    QryInstrument,
    QryInvestorPosition(InvestorField),
    QryTradingAccount,
    OrderInsert(InputOrderField),
    OrderAction(InputOrderActionField),
    ForQuoteInsert(InputForQuoteField),
}

// ---------------------------------------------------------------------------
// Callback payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RspUserLoginField {
    pub front_id: i32,
    pub session_id: i32,
    pub trading_day: String,
    pub max_order_ref: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderField {
    pub instrument_id: String,
    pub exchange_id: String,
    pub front_id: i32,
    pub session_id: i32,
    pub order_ref: String,
    pub order_sys_id: String,
    pub order_price_type: char,
    pub time_condition: char,
    pub volume_condition: char,
    pub direction: char,
    pub comb_offset_flag: char,
    pub limit_price: f64,
    pub volume_total_original: i64,
    pub volume_traded: i64,
    pub order_status: char,
    /// `YYYYMMDD`
    pub insert_date: String,
    /// `HH:MM:SS`
    pub insert_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeField {
    pub instrument_id: String,
    pub exchange_id: String,
    pub order_sys_id: String,
    pub trade_id: String,
    pub direction: char,
    pub offset_flag: char,
    pub price: f64,
    pub volume: i64,
    pub trade_date: String,
    pub trade_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestorPositionField {
    pub instrument_id: String,
    pub posi_direction: char,
    pub position: i64,
    pub today_position: i64,
    pub yd_position: i64,
    pub position_cost: f64,
    pub position_profit: f64,
    pub long_frozen: i64,
    pub short_frozen: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingAccountField {
    /// Empty when the broker returned a record without an account.
    pub account_id: String,
    pub balance: f64,
    pub available: f64,
    pub frozen_margin: f64,
    pub frozen_cash: f64,
    pub frozen_commission: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentField {
    pub instrument_id: String,
    pub exchange_id: String,
    pub instrument_name: String,
    pub product_class: char,
    pub product_id: String,
    pub volume_multiple: f64,
    pub price_tick: f64,
    pub underlying_instr_id: String,
    pub options_type: char,
    pub strike_price: f64,
    /// `YYYYMMDD`
    pub expire_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FuturesCallback {
    FrontConnected,
    FrontDisconnected {
        #[serde(default)]
        reason: i32,
    },
    RspAuthenticate {
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspUserLogin {
        #[serde(default)]
        data: RspUserLoginField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspSettlementInfoConfirm {
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspQryInstrument {
        #[serde(default)]
        data: Option<InstrumentField>,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspQryInvestorPosition {
        #[serde(default)]
        data: Option<InvestorPositionField>,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspQryTradingAccount {
        #[serde(default)]
        data: TradingAccountField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    /// Order insert refused by the broker; `data` echoes the request.
    RspOrderInsert {
        data: InputOrderField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspOrderAction {
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspForQuoteInsert {
        #[serde(default)]
        data: InputForQuoteField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RtnOrder {
        data: OrderField,
    },
    RtnTrade {
        data: TradeField,
    },
}
