//! Payload builders and login-pipeline drivers for scenario tests.
//!
//! Field values mirror what the broker sends on a normal trading day;
//! anything not relevant to a scenario is left at its default.

use std::sync::Arc;

use tgw_directory::{ContractDirectory, SharedDirectory};
use tgw_protocol::codes::{futures as f, stock as s};
use tgw_protocol::futures::{
    FuturesCallback, FuturesRequest, InstrumentField, InvestorPositionField, OrderField,
    RspUserLoginField as FuturesLoginField, TradeField,
};
use tgw_protocol::md::{MarketDataField, MdCallback, MdRequest};
use tgw_protocol::options::{
    OptionInstrumentField, OptionsCallback, OptionsOrderField, OptionsRequest, OptionsTradeField,
    RspUserLoginField as OptionsLoginField,
};
use tgw_protocol::{NativeApi, RspInfo, RspMeta};
use tgw_schemas::{ContractData, Direction, Exchange, Offset, OrderRequest, OrderType, Product};
use tgw_session::{FuturesSession, MdSession, OptionsSession, RetryPolicy};

use crate::{RecordingSink, ScriptedApi};

pub const TRADING_DAY: &str = "20240605";

fn page(is_last: bool) -> RspMeta {
    RspMeta {
        request_id: 0,
        is_last,
    }
}

// ---------------------------------------------------------------------------
// Session harnesses
// ---------------------------------------------------------------------------

/// A session wired to a scripted transport, a recording sink and its own
/// directory. `api` shares state with the transport the session owns.
pub struct Harness<S, R> {
    pub session: S,
    pub api: ScriptedApi<R>,
    pub sink: Arc<RecordingSink>,
    pub directory: SharedDirectory,
}

pub fn futures_harness(gateway_name: &str) -> Harness<FuturesSession<ScriptedApi<FuturesRequest>>, FuturesRequest> {
    let api = ScriptedApi::new();
    let sink = Arc::new(RecordingSink::new());
    let directory = ContractDirectory::shared();
    let session = FuturesSession::new(api.clone(), Arc::clone(&directory), sink.clone(), gateway_name)
        .with_retry_policy(RetryPolicy::immediate(5));
    Harness {
        session,
        api,
        sink,
        directory,
    }
}

pub fn options_harness(gateway_name: &str, seed: u64) -> Harness<OptionsSession<ScriptedApi<OptionsRequest>>, OptionsRequest> {
    let api = ScriptedApi::new();
    let sink = Arc::new(RecordingSink::new());
    let directory = ContractDirectory::shared();
    let session = OptionsSession::new(api.clone(), Arc::clone(&directory), sink.clone(), gateway_name, seed)
        .with_countdown_ticks(2);
    Harness {
        session,
        api,
        sink,
        directory,
    }
}

pub fn md_harness(gateway_name: &str) -> Harness<MdSession<ScriptedApi<MdRequest>>, MdRequest> {
    let api = ScriptedApi::new();
    let sink = Arc::new(RecordingSink::new());
    let directory = ContractDirectory::shared();
    let session = MdSession::new(api.clone(), Arc::clone(&directory), sink.clone(), gateway_name);
    Harness {
        session,
        api,
        sink,
        directory,
    }
}

pub fn futures_contract(symbol: &str, exchange: Exchange, size: f64) -> ContractData {
    ContractData {
        symbol: symbol.to_string(),
        exchange,
        name: symbol.to_string(),
        product: Product::Futures,
        size,
        pricetick: 1.0,
        option: None,
        gateway_name: "NHFUTURES".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Host requests
// ---------------------------------------------------------------------------

pub fn limit_order(symbol: &str, exchange: Exchange, direction: Direction, offset: Offset) -> OrderRequest {
    OrderRequest {
        symbol: symbol.to_string(),
        exchange,
        direction,
        order_type: OrderType::Limit,
        volume: 1,
        price: 100.0,
        offset,
        reference: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Futures
// ---------------------------------------------------------------------------

pub fn futures_instrument(symbol: &str, exchange: Exchange, size: f64) -> InstrumentField {
    InstrumentField {
        instrument_id: symbol.to_string(),
        exchange_id: exchange.to_string(),
        instrument_name: symbol.to_string(),
        product_class: f::PC_FUTURES,
        product_id: symbol.trim_end_matches(|c: char| c.is_ascii_digit()).to_string(),
        volume_multiple: size,
        price_tick: 1.0,
        expire_date: "20241015".to_string(),
        ..Default::default()
    }
}

pub fn futures_login_ok(front_id: i32, session_id: i32) -> FuturesCallback {
    FuturesCallback::RspUserLogin {
        data: FuturesLoginField {
            front_id,
            session_id,
            trading_day: TRADING_DAY.to_string(),
            max_order_ref: "0".to_string(),
        },
        info: RspInfo::ok(),
        meta: RspMeta::default(),
    }
}

pub fn futures_login_refused(error_id: i32) -> FuturesCallback {
    FuturesCallback::RspUserLogin {
        data: FuturesLoginField::default(),
        info: RspInfo::error(error_id, "invalid password"),
        meta: RspMeta::default(),
    }
}

pub fn futures_instrument_page(data: InstrumentField, is_last: bool) -> FuturesCallback {
    FuturesCallback::RspQryInstrument {
        data: Some(data),
        info: RspInfo::ok(),
        meta: page(is_last),
    }
}

/// Working order push (`NoTradeQueueing`).
pub fn futures_order(symbol: &str, exchange: Exchange, front_id: i32, session_id: i32, order_ref: &str, sysid: &str) -> OrderField {
    OrderField {
        instrument_id: symbol.to_string(),
        exchange_id: exchange.to_string(),
        front_id,
        session_id,
        order_ref: order_ref.to_string(),
        order_sys_id: sysid.to_string(),
        order_price_type: f::OPT_LIMIT_PRICE,
        time_condition: f::TC_GFD,
        volume_condition: f::VC_AV,
        direction: f::D_BUY,
        comb_offset_flag: f::OF_OPEN,
        limit_price: 3500.0,
        volume_total_original: 2,
        volume_traded: 0,
        order_status: f::OST_NO_TRADE_QUEUEING,
        insert_date: TRADING_DAY.to_string(),
        insert_time: "09:30:00".to_string(),
    }
}

pub fn futures_trade(symbol: &str, exchange: Exchange, sysid: &str, trade_id: &str, volume: i64) -> TradeField {
    TradeField {
        instrument_id: symbol.to_string(),
        exchange_id: exchange.to_string(),
        order_sys_id: sysid.to_string(),
        trade_id: trade_id.to_string(),
        direction: f::D_BUY,
        offset_flag: f::OF_OPEN,
        price: 3500.0,
        volume,
        trade_date: TRADING_DAY.to_string(),
        trade_time: "09:30:01".to_string(),
    }
}

/// One position page record. `direction` is the normalized side.
pub fn position_record(
    symbol: &str,
    direction: Direction,
    position: i64,
    today_position: i64,
    position_cost: f64,
) -> InvestorPositionField {
    InvestorPositionField {
        instrument_id: symbol.to_string(),
        posi_direction: match direction {
            Direction::Long => f::PD_LONG,
            Direction::Short => f::PD_SHORT,
        },
        position,
        today_position,
        yd_position: position - today_position,
        position_cost,
        position_profit: 0.0,
        long_frozen: 0,
        short_frozen: 0,
    }
}

pub fn position_page(data: InvestorPositionField, is_last: bool) -> FuturesCallback {
    FuturesCallback::RspQryInvestorPosition {
        data: Some(data),
        info: RspInfo::ok(),
        meta: page(is_last),
    }
}

/// Front connected → login → settlement confirmed → one instrument page per
/// entry. Leaves the session in `ContractsLoaded` when `instruments` is
/// non-empty and the transport accepted the instrument query.
pub fn drive_futures_to_loaded<A>(session: &mut FuturesSession<A>, instruments: &[InstrumentField])
where
    A: NativeApi<FuturesRequest>,
{
    session.handle(FuturesCallback::FrontConnected);
    session.handle(futures_login_ok(1, 7));
    session.handle(FuturesCallback::RspSettlementInfoConfirm {
        info: RspInfo::ok(),
        meta: RspMeta::default(),
    });
    let n = instruments.len();
    for (i, ins) in instruments.iter().enumerate() {
        session.handle(futures_instrument_page(ins.clone(), i + 1 == n));
    }
}

// ---------------------------------------------------------------------------
// Stock options
// ---------------------------------------------------------------------------

pub fn option_instrument(contract_id: &str, display_symbol: &str, strike: f64) -> OptionInstrumentField {
    OptionInstrumentField {
        contract_id: contract_id.to_string(),
        contract_symbol: display_symbol.to_string(),
        contract_multiplier_unit: 10000.0,
        tick_size: 0.0001,
        underlying_security_id: "510050".to_string(),
        expire_date: "20240626".to_string(),
        call_or_put: s::CALL_OR_PUT_E,
        exercise_price: strike,
    }
}

pub fn options_login_ok(max_cl_ord_id: u64) -> OptionsCallback {
    OptionsCallback::RspUserLogin {
        data: OptionsLoginField {
            max_cl_ord_id,
            trading_day: TRADING_DAY.to_string(),
        },
        info: RspInfo::ok(),
        meta: RspMeta::default(),
    }
}

pub fn options_login_refused(error_id: i32) -> OptionsCallback {
    OptionsCallback::RspUserLogin {
        data: OptionsLoginField::default(),
        info: RspInfo::error(error_id, "user locked"),
        meta: RspMeta::default(),
    }
}

pub fn option_instrument_page(data: OptionInstrumentField, is_last: bool) -> OptionsCallback {
    OptionsCallback::RspQryOptions {
        data: Some(data),
        info: RspInfo::ok(),
        meta: page(is_last),
    }
}

pub fn options_order(security_id: &str, cl_ord_id: u64, order_id: &str, status: char) -> OptionsOrderField {
    OptionsOrderField {
        security_id: security_id.to_string(),
        cl_ord_id,
        order_id: order_id.to_string(),
        ord_type: s::ORD_TYPE_LIMIT,
        time_in_force: s::TIF_GFD,
        side: s::SIDE_BUY,
        position_effect: s::OC_OPEN,
        price: 0.05,
        order_qty: 1,
        trade_qty: 0,
        ord_status: status,
        transact_time_only: 93015,
    }
}

pub fn options_trade(security_id: &str, cl_ord_id: u64, order_id: &str, exec_id: &str) -> OptionsTradeField {
    OptionsTradeField {
        security_id: security_id.to_string(),
        cl_ord_id,
        order_id: order_id.to_string(),
        exec_id: exec_id.to_string(),
        side: s::SIDE_BUY,
        position_effect: s::OC_OPEN,
        last_px: 0.05,
        last_qty: 1,
        transact_time_only: 93016,
    }
}

/// Front connected → login → countdown expiry → one option page per entry.
pub fn drive_options_to_loaded<A>(session: &mut OptionsSession<A>, instruments: &[OptionInstrumentField])
where
    A: NativeApi<OptionsRequest>,
{
    session.handle(OptionsCallback::FrontConnected);
    session.handle(options_login_ok(0));
    while session.countdown().is_some() {
        session.on_timer();
    }
    let n = instruments.len();
    for (i, ins) in instruments.iter().enumerate() {
        session.handle(option_instrument_page(ins.clone(), i + 1 == n));
    }
}

// ---------------------------------------------------------------------------
// Market data
// ---------------------------------------------------------------------------

pub fn market_data(symbol: &str, update_time: &str) -> MarketDataField {
    MarketDataField {
        instrument_id: symbol.to_string(),
        update_time: update_time.to_string(),
        update_millisec: 500,
        volume: 1200,
        open_interest: 3400.0,
        last_price: 3500.0,
        upper_limit_price: 3700.0,
        lower_limit_price: 3300.0,
        open_price: 3480.0,
        highest_price: 3510.0,
        lowest_price: 3470.0,
        pre_close_price: 3490.0,
        bid_price: [3499.0, 0.0, 0.0, 0.0, 0.0],
        ask_price: [3501.0, 0.0, 0.0, 0.0, 0.0],
        bid_volume: [10, 0, 0, 0, 0],
        ask_volume: [12, 0, 0, 0, 0],
    }
}

pub fn md_login_ok() -> MdCallback {
    MdCallback::RspUtpLogin {
        response_code: 0,
        response_string: String::new(),
        meta: RspMeta::default(),
    }
}

/// Front connected → login accepted.
pub fn drive_md_to_ready<A: NativeApi<MdRequest>>(session: &mut MdSession<A>) {
    session.handle(MdCallback::FrontConnected);
    session.handle(md_login_ok());
}
