//! Market-data API payloads.

use serde::{Deserialize, Serialize};

use crate::RspMeta;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtpLoginField {
    pub developer_code: String,
    pub developer_license: String,
    pub user_id: String,
    pub user_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MdRequest {
    UtpLogin(UtpLoginField),
    /// `key` is the venue-qualified instrument key, see
    /// [`crate::mapping::md_subscribe_key`].
    Subscribe { key: String },
}

/// Raw market snapshot. Price fields may carry `f64::MAX` meaning "no value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataField {
    pub instrument_id: String,
    /// `HH:MM:SS`
    pub update_time: String,
    pub update_millisec: i32,
    pub volume: i64,
    pub open_interest: f64,
    pub last_price: f64,
    pub upper_limit_price: f64,
    pub lower_limit_price: f64,
    pub open_price: f64,
    pub highest_price: f64,
    pub lowest_price: f64,
    pub pre_close_price: f64,
    pub bid_price: [f64; 5],
    pub ask_price: [f64; 5],
    pub bid_volume: [i64; 5],
    pub ask_volume: [i64; 5],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MdCallback {
    FrontConnected,
    FrontDisconnected,
    RspError {
        error_message: String,
        #[serde(default)]
        meta: RspMeta,
    },
    RspUtpLogin {
        response_code: i32,
        #[serde(default)]
        response_string: String,
        #[serde(default)]
        meta: RspMeta,
    },
    RspSubscribe {
        response_code: i32,
        #[serde(default)]
        response_string: String,
        #[serde(default)]
        meta: RspMeta,
    },
    RtnMarketData {
        data: MarketDataField,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_parses_from_recorded_line() {
        let line = r#"{"type":"rsp_utp_login","response_code":0}"#;
        let cb: MdCallback = serde_json::from_str(line).unwrap();
        match cb {
            MdCallback::RspUtpLogin {
                response_code,
                meta,
                ..
            } => {
                assert_eq!(response_code, 0);
                assert!(meta.is_last);
            }
            other => panic!("unexpected callback: {other:?}"),
        }
    }
}
