//! Stock-option trading API payloads (FIX-style field set).

use serde::{Deserialize, Serialize};

use crate::{RspInfo, RspMeta};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoginField {
    pub user_id: String,
    pub password: String,
    pub user_product_info: String,
    pub interface_product_info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsInsertField {
    pub security_id: String,
    pub price: f64,
    pub order_qty: i64,
    pub ord_type: char,
    pub side: char,
    pub position_effect: char,
    pub time_in_force: char,
    pub cl_ord_id: u64,
    pub party_id: String,
    pub covered_or_uncovered: i32,
    pub owner_type: i32,
}

/// Cancel by original client order id when known, else by exchange order id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsCancelField {
    pub cl_ord_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_cl_ord_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyField {
    pub party_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseField {
    pub cl_ord_id: u64,
    pub security_id: String,
    pub owner_type: i32,
    pub order_qty: i64,
    pub party_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombExerciseField {
    pub cl_ord_id: u64,
    pub owner_type: i32,
    pub order_qty: i64,
    pub party_id: String,
    pub leg_security_id1: String,
    pub leg_order_qty1: i64,
    pub leg_security_id2: String,
    pub leg_order_qty2: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseCancelField {
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OptionsRequest {
    UserLogin(UserLoginField),
    OptionsInsert(OptionsInsertField),
    OptionsCancel(OptionsCancelField),
    QryOptions,
    QryPartAccount(PartyField),
    QryPosition(PartyField),
    Exercise(ExerciseField),
    CombExercise(CombExerciseField),
    ExerciseCancel(ExerciseCancelField),
    QryExercise(PartyField),
}

// ---------------------------------------------------------------------------
// Callback payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RspUserLoginField {
    pub max_cl_ord_id: u64,
    /// `YYYYMMDD`
    pub trading_day: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseRecordField {
    pub order_id: String,
    pub order_qty: i64,
    pub security_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombExerciseRecordField {
    pub order_id: String,
    pub order_qty: i64,
    pub leg_security_id1: String,
    pub leg_security_id2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartAccountField {
    pub party_id: String,
    pub balance: f64,
    pub available: f64,
    pub frozen_margin: f64,
    pub frozen_premium: f64,
    pub frozen_commi: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionField {
    pub security_id: String,
    pub side: char,
    pub position: i64,
    pub yd_position: i64,
    pub position_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionInstrumentField {
    pub contract_id: String,
    /// Exchange display symbol, carries the month/adjustment marker letter.
    pub contract_symbol: String,
    pub contract_multiplier_unit: f64,
    pub tick_size: f64,
    pub underlying_security_id: String,
    /// `YYYYMMDD`
    pub expire_date: String,
    pub call_or_put: char,
    pub exercise_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsOrderField {
    pub security_id: String,
    pub cl_ord_id: u64,
    /// Exchange-assigned order id.
    pub order_id: String,
    pub ord_type: char,
    pub time_in_force: char,
    pub side: char,
    pub position_effect: char,
    pub price: f64,
    pub order_qty: i64,
    pub trade_qty: i64,
    pub ord_status: char,
    /// `HHMMSS` without leading zero, e.g. `93015`.
    pub transact_time_only: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsTradeField {
    pub security_id: String,
    pub cl_ord_id: u64,
    pub order_id: String,
    pub exec_id: String,
    pub side: char,
    pub position_effect: char,
    pub last_px: f64,
    pub last_qty: i64,
    pub transact_time_only: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionsCallback {
    FrontConnected,
    FrontDisconnected {
        #[serde(default)]
        reason: i32,
    },
    RspUserLogin {
        #[serde(default)]
        data: RspUserLoginField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    /// `data` echoes the insert request.
    RspOptionsInsert {
        #[serde(default)]
        data: OptionsInsertField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspOptionsCancel {
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspQryPartAccount {
        #[serde(default)]
        data: PartAccountField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspQryPosition {
        #[serde(default)]
        data: Option<PositionField>,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspQryOptions {
        #[serde(default)]
        data: Option<OptionInstrumentField>,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RtnOptionsOrder {
        data: OptionsOrderField,
    },
    RtnOptionsTrade {
        data: OptionsTradeField,
    },
    RspExercise {
        #[serde(default)]
        data: ExerciseRecordField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspExerciseCancel {
        #[serde(default)]
        data: ExerciseRecordField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RtnExercise {
        data: ExerciseRecordField,
    },
    RspQryExercise {
        #[serde(default)]
        data: ExerciseRecordField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
    RspCombExercise {
        #[serde(default)]
        data: CombExerciseRecordField,
        #[serde(default)]
        info: RspInfo,
        #[serde(default)]
        meta: RspMeta,
    },
}
