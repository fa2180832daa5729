//! Stock-option session state machine.
//!
//! ```text
//! Disconnected ─front connected─► Connected ─login ok─► LoggedIn ─► InstrumentsPending
//!                                                                     │ countdown expires,
//!                                                                     │ contract query sent
//!                                                                     ▼
//!                                                    last contract page ─► ContractsLoaded
//! ```
//!
//! The contract query is not sent on login. A countdown armed at login is
//! decremented by the host timer ([`OptionsSession::on_timer`]) and the query
//! goes out once when it reaches zero.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Timelike};
use tgw_directory::SharedDirectory;
use tgw_protocol::codes::stock as codes;
use tgw_protocol::mapping::{
    direction_from_stock, direction_to_stock, offset_from_stock, offset_to_stock,
    option_type_from_stock, order_type_from_stock, order_type_to_stock, status_from_stock,
    stock_option_exchange,
};
use tgw_protocol::options::{
    CombExerciseField, CombExerciseRecordField, ExerciseCancelField, ExerciseField,
    ExerciseRecordField, OptionInstrumentField, OptionsCallback, OptionsCancelField,
    OptionsInsertField, OptionsOrderField, OptionsRequest, OptionsTradeField, PartAccountField,
    PartyField, PositionField, RspUserLoginField, UserLoginField,
};
use tgw_protocol::{NativeApi, RequestSeq, RspInfo, RspMeta, ValidationError};
use tgw_schemas::{
    AccountData, CancelRequest, ConnectSettings, ContractData, ExerciseData, ExerciseRequest,
    GatewayEvent, Offset, OptionDetails, OrderData, OrderRequest, OrderType, PositionData,
    Product, Status, TradeData,
};

use super::option_index;
use crate::replay::ReplayBuffer;
use crate::sink::{Emitter, EventSink};
use crate::time;

/// Host timer ticks between login and the contract query.
pub const INSTRUMENT_COUNTDOWN_TICKS: u32 = 10;

/// Initial client-order-id: wall-clock `HHMMSS` followed by four zeros, so a
/// restarted process does not reuse ids from earlier in the day.
pub fn seed_order_ref(now: NaiveTime) -> u64 {
    let hhmmss = u64::from(now.hour()) * 10_000 + u64::from(now.minute()) * 100 + u64::from(now.second());
    hhmmss * 10_000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsState {
    Disconnected,
    Connected,
    LoggedIn,
    InstrumentsPending,
    ContractsLoaded,
}

#[derive(Debug, Clone, Default)]
struct Credentials {
    user_id: String,
    password: String,
    party_id: String,
    app_id: String,
    auth_code: String,
}

pub struct OptionsSession<A: NativeApi<OptionsRequest>> {
    api: A,
    emitter: Emitter,
    directory: SharedDirectory,
    reqs: RequestSeq,

    state: OptionsState,
    transport_open: bool,
    login_failed: bool,
    credentials: Credentials,

    order_ref: u64,
    trading_day: Option<NaiveDate>,
    countdown: Option<u32>,
    countdown_ticks: u32,

    pending: ReplayBuffer<OptionsOrderField, OptionsTradeField>,
    /// Active orders placed by this process, keyed by client order id.
    /// Dropped once a push or rejection makes them terminal.
    orders: HashMap<u64, OrderData>,
    /// Every client order id placed by this process. Trades can arrive after
    /// their order is done and still resolve to the client id.
    local_ids: HashSet<u64>,
}

impl<A: NativeApi<OptionsRequest>> OptionsSession<A> {
    pub fn new(
        api: A,
        directory: SharedDirectory,
        sink: Arc<dyn EventSink>,
        gateway_name: impl Into<String>,
        order_ref_seed: u64,
    ) -> Self {
        Self {
            api,
            emitter: Emitter::new(gateway_name, sink),
            directory,
            reqs: RequestSeq::new(),
            state: OptionsState::Disconnected,
            transport_open: false,
            login_failed: false,
            credentials: Credentials::default(),
            order_ref: order_ref_seed,
            trading_day: None,
            countdown: None,
            countdown_ticks: INSTRUMENT_COUNTDOWN_TICKS,
            pending: ReplayBuffer::new(),
            orders: HashMap::new(),
            local_ids: HashSet::new(),
        }
    }

    pub fn with_countdown_ticks(mut self, ticks: u32) -> Self {
        self.countdown_ticks = ticks.max(1);
        self
    }

    pub fn state(&self) -> OptionsState {
        self.state
    }

    pub fn login_failed(&self) -> bool {
        self.login_failed
    }

    pub fn contracts_loaded(&self) -> bool {
        self.pending.is_released()
    }

    /// Last client order id handed out.
    pub fn order_ref(&self) -> u64 {
        self.order_ref
    }

    pub fn trading_day(&self) -> Option<NaiveDate> {
        self.trading_day
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn gateway_name(&self) -> &str {
        self.emitter.gateway_name()
    }

    // -----------------------------------------------------------------------
    // Host commands
    // -----------------------------------------------------------------------

    pub fn connect(&mut self, address: &str, settings: &ConnectSettings) {
        self.credentials = Credentials {
            user_id: settings.user_id.clone(),
            password: settings.password.clone(),
            party_id: settings.party_id.clone(),
            app_id: settings.app_id.clone(),
            auth_code: settings.auth_code.clone(),
        };

        if !self.transport_open {
            tracing::info!(gateway = %self.gateway_name(), address, "opening stock-option trading transport");
            self.api.open(address);
            self.transport_open = true;
        } else {
            self.login();
        }
    }

    pub fn send_order(&mut self, req: &OrderRequest) -> Result<String, ValidationError> {
        let checked = offset_to_stock(req.offset)
            .ok_or(ValidationError::UnsupportedOffset(req.offset))
            .and_then(|offset| {
                order_type_to_stock(req.order_type)
                    .map(|kind| (offset, kind))
                    .ok_or(ValidationError::UnsupportedOrderType(req.order_type))
            });
        let (offset, (ord_type, time_in_force)) = match checked {
            Ok(v) => v,
            Err(e) => {
                self.emitter.write_log(e.to_string());
                return Err(e);
            }
        };

        self.order_ref += 1;
        let cl_ord_id = self.order_ref;
        let field = OptionsInsertField {
            security_id: req.symbol.clone(),
            price: req.price,
            order_qty: req.volume,
            ord_type,
            side: direction_to_stock(req.direction),
            position_effect: offset,
            time_in_force,
            cl_ord_id,
            party_id: self.credentials.party_id.clone(),
            covered_or_uncovered: codes::COVERED_NO,
            owner_type: codes::OWNER_TYPE_PERSONAL,
        };
        self.send(OptionsRequest::OptionsInsert(field));

        let order = req.create_order_data(cl_ord_id.to_string(), self.gateway_name());
        let vt_orderid = order.vt_orderid();
        self.orders.insert(cl_ord_id, order.clone());
        self.local_ids.insert(cl_ord_id);
        self.emitter.publish(GatewayEvent::Order(order));
        Ok(vt_orderid)
    }

    /// Orders placed by this process are cancelled by client order id; any
    /// other id is treated as an exchange order id.
    pub fn cancel_order(&mut self, req: &CancelRequest) -> Result<(), ValidationError> {
        self.order_ref += 1;
        let local = req
            .orderid
            .parse::<u64>()
            .ok()
            .filter(|id| self.local_ids.contains(id));

        let field = match local {
            Some(orig) => OptionsCancelField {
                cl_ord_id: self.order_ref,
                orig_cl_ord_id: Some(orig),
                order_id: None,
            },
            None => OptionsCancelField {
                cl_ord_id: self.order_ref,
                orig_cl_ord_id: None,
                order_id: Some(req.orderid.clone()),
            },
        };
        self.send(OptionsRequest::OptionsCancel(field));
        Ok(())
    }

    pub fn query_account(&mut self) {
        if let Some(party) = self.party() {
            self.send(OptionsRequest::QryPartAccount(party));
        }
    }

    pub fn query_position(&mut self) {
        if let Some(party) = self.party() {
            self.send(OptionsRequest::QryPosition(party));
        }
    }

    /// Single-leg exercise, or a combination exercise when a second leg is given.
    pub fn send_exercise(&mut self, req: &ExerciseRequest) {
        self.order_ref += 1;
        let party_id = self.credentials.party_id.clone();
        let leg2 = req.leg2_symbol.as_deref().filter(|s| !s.is_empty());

        let request = match leg2 {
            None => OptionsRequest::Exercise(ExerciseField {
                cl_ord_id: self.order_ref,
                security_id: req.leg1_symbol.clone(),
                owner_type: codes::OWNER_TYPE_PERSONAL,
                order_qty: req.volume,
                party_id,
            }),
            Some(leg2) => OptionsRequest::CombExercise(CombExerciseField {
                cl_ord_id: self.order_ref,
                owner_type: codes::OWNER_TYPE_PERSONAL,
                order_qty: req.volume,
                party_id,
                leg_security_id1: req.leg1_symbol.clone(),
                leg_order_qty1: req.volume,
                leg_security_id2: leg2.to_string(),
                leg_order_qty2: req.volume,
            }),
        };
        self.send(request);
    }

    pub fn cancel_exercise(&mut self, req: &CancelRequest) {
        self.send(OptionsRequest::ExerciseCancel(ExerciseCancelField {
            order_id: req.orderid.clone(),
        }));
    }

    pub fn query_exercise(&mut self) {
        if let Some(party) = self.party() {
            self.send(OptionsRequest::QryExercise(party));
        }
    }

    /// Host timer tick: runs the contract-query countdown while armed.
    pub fn on_timer(&mut self) {
        let Some(remaining) = self.countdown else {
            return;
        };
        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.countdown = Some(remaining);
            return;
        }

        self.countdown = None;
        tracing::debug!(gateway = %self.gateway_name(), "instrument countdown expired, querying contracts");
        self.send(OptionsRequest::QryOptions);
    }

    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    pub fn close(&mut self) {
        if self.transport_open {
            self.api.close();
            self.transport_open = false;
            self.state = OptionsState::Disconnected;
            self.countdown = None;
        }
    }

    // -----------------------------------------------------------------------
    // Callback dispatch
    // -----------------------------------------------------------------------

    pub fn handle(&mut self, callback: OptionsCallback) {
        match callback {
            OptionsCallback::FrontConnected => {
                self.state = OptionsState::Connected;
                self.emitter.write_log("trade server connected");
                self.login();
            }
            OptionsCallback::FrontDisconnected { reason } => {
                self.state = OptionsState::Disconnected;
                self.emitter
                    .write_log(format!("trade server disconnected, reason {reason}"));
            }
            OptionsCallback::RspUserLogin { data, info, .. } => self.on_login(&data, &info),
            OptionsCallback::RspOptionsInsert { data, info, .. } => {
                if info.is_error() {
                    self.on_insert_error(&data, &info);
                }
            }
            OptionsCallback::RspOptionsCancel { info, .. } => {
                if info.is_error() {
                    self.emitter.write_error("order cancel failed", &info);
                }
            }
            OptionsCallback::RspQryPartAccount { data, .. } => self.on_account(&data),
            OptionsCallback::RspQryPosition { data, .. } => {
                if let Some(data) = data {
                    self.on_position(&data);
                }
            }
            OptionsCallback::RspQryOptions { data, meta, .. } => {
                self.on_instrument(data.as_ref(), meta)
            }
            OptionsCallback::RtnOptionsOrder { data } => {
                if let Some(data) = self.pending.admit_order(data) {
                    self.process_order(&data);
                }
            }
            OptionsCallback::RtnOptionsTrade { data } => {
                if let Some(data) = self.pending.admit_trade(data) {
                    self.process_trade(&data);
                }
            }
            OptionsCallback::RspExercise { data, info, .. } => {
                self.on_exercise_record(&data, &info, true)
            }
            OptionsCallback::RspExerciseCancel { data, info, .. } => {
                self.on_exercise_record(&data, &info, false)
            }
            OptionsCallback::RtnExercise { data } => {
                self.on_exercise_record(&data, &RspInfo::ok(), true)
            }
            OptionsCallback::RspQryExercise { data, info, .. } => {
                if info.is_error() || !data.order_id.is_empty() {
                    self.on_exercise_record(&data, &info, true);
                }
            }
            OptionsCallback::RspCombExercise { data, info, .. } => {
                self.on_comb_exercise(&data, &info)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Login / contract pipeline
    // -----------------------------------------------------------------------

    fn party(&self) -> Option<PartyField> {
        if self.credentials.party_id.is_empty() {
            tracing::debug!(gateway = %self.gateway_name(), "no party id configured, query skipped");
            return None;
        }
        Some(PartyField {
            party_id: self.credentials.party_id.clone(),
        })
    }

    fn login(&mut self) {
        if self.login_failed {
            tracing::debug!(gateway = %self.gateway_name(), "login suppressed after earlier failure");
            return;
        }
        let field = UserLoginField {
            user_id: self.credentials.user_id.clone(),
            password: self.credentials.password.clone(),
            user_product_info: self.credentials.app_id.clone(),
            interface_product_info: self.credentials.auth_code.clone(),
        };
        self.send(OptionsRequest::UserLogin(field));
    }

    fn on_login(&mut self, data: &RspUserLoginField, info: &RspInfo) {
        if info.is_error() {
            self.login_failed = true;
            self.emitter.write_error("trade server login failed", info);
            return;
        }

        self.state = OptionsState::LoggedIn;
        self.emitter.write_log("trade server login succeeded");

        self.order_ref = self.order_ref.max(data.max_cl_ord_id);
        self.trading_day = time::parse_compact_date(&data.trading_day);
        if self.trading_day.is_none() {
            tracing::warn!(
                gateway = %self.gateway_name(),
                trading_day = %data.trading_day,
                "unparseable trading day, falling back to local date"
            );
        }

        self.countdown = Some(self.countdown_ticks);
        self.state = OptionsState::InstrumentsPending;
    }

    fn on_instrument(&mut self, data: Option<&OptionInstrumentField>, meta: RspMeta) {
        if let Some(contract) = data.and_then(|d| contract_from_option(d, self.gateway_name())) {
            self.emitter.publish(GatewayEvent::Contract(contract.clone()));
            self.directory.register(contract);
        }

        if !meta.is_last {
            return;
        }

        self.state = OptionsState::ContractsLoaded;
        self.emitter.write_log("contract query succeeded");

        let (orders, trades) = self.pending.release();
        if !orders.is_empty() || !trades.is_empty() {
            tracing::info!(
                gateway = %self.gateway_name(),
                orders = orders.len(),
                trades = trades.len(),
                "replaying buffered order/trade pushes"
            );
        }
        for order in &orders {
            self.process_order(order);
        }
        for trade in &trades {
            self.process_trade(trade);
        }
    }

    // -----------------------------------------------------------------------
    // Query responses
    // -----------------------------------------------------------------------

    fn on_account(&mut self, data: &PartAccountField) {
        if data.party_id.is_empty() {
            return;
        }
        let account = AccountData {
            accountid: data.party_id.clone(),
            balance: data.balance,
            frozen: data.frozen_margin + data.frozen_premium + data.frozen_commi,
            available: data.available,
            gateway_name: self.gateway_name().to_string(),
        };
        self.emitter.publish(GatewayEvent::Account(account));
    }

    fn on_position(&mut self, data: &PositionField) {
        let Some(contract) = self.directory.lookup(&data.security_id) else {
            tracing::debug!(gateway = %self.gateway_name(), symbol = %data.security_id, "position for unknown contract skipped");
            return;
        };
        let Some(direction) = direction_from_stock(data.side) else {
            tracing::warn!(gateway = %self.gateway_name(), code = %data.side, "position with unknown side skipped");
            return;
        };

        let mut position = PositionData::new(
            data.security_id.clone(),
            contract.exchange,
            direction,
            self.gateway_name().to_string(),
        );
        position.volume = data.position;
        position.yd_volume = data.yd_position;
        let divisor = data.position as f64 * contract.size;
        position.price = if divisor != 0.0 {
            data.position_cost / divisor
        } else {
            0.0
        };
        self.emitter.publish(GatewayEvent::Position(position));
    }

    // -----------------------------------------------------------------------
    // Orders, trades, exercise
    // -----------------------------------------------------------------------

    fn on_insert_error(&mut self, data: &OptionsInsertField, info: &RspInfo) {
        match self.orders.remove(&data.cl_ord_id) {
            Some(mut order) => {
                order.status = Status::Rejected;
                self.emitter.publish(GatewayEvent::Order(order));
            }
            None => tracing::warn!(
                gateway = %self.gateway_name(),
                cl_ord_id = data.cl_ord_id,
                "insert rejection for unknown client order id"
            ),
        }
        self.emitter.write_error("order insert failed", info);
    }

    /// Client order id when this process placed the order, else the exchange id.
    fn resolve_orderid(&self, cl_ord_id: u64, order_id: &str) -> String {
        if self.local_ids.contains(&cl_ord_id) {
            cl_ord_id.to_string()
        } else {
            order_id.to_string()
        }
    }

    fn timestamp(&self, packed: u32) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        let date = self.trading_day.unwrap_or_else(time::china_today);
        time::compose_packed_time(date, packed)
    }

    fn process_order(&mut self, data: &OptionsOrderField) {
        let Some(contract) = self.directory.lookup(&data.security_id) else {
            tracing::warn!(gateway = %self.gateway_name(), symbol = %data.security_id, "order push for unknown contract skipped");
            return;
        };
        let Some(status) = status_from_stock(data.ord_status) else {
            tracing::warn!(gateway = %self.gateway_name(), code = %data.ord_status, "order push with unknown status skipped");
            return;
        };
        let Some(direction) = direction_from_stock(data.side) else {
            tracing::warn!(gateway = %self.gateway_name(), code = %data.side, "order push with unknown side skipped");
            return;
        };
        let order_type = order_type_from_stock(data.ord_type, data.time_in_force).unwrap_or_else(|| {
            tracing::debug!(
                gateway = %self.gateway_name(),
                ord_type = %data.ord_type,
                time_in_force = %data.time_in_force,
                "unmapped order type, reporting as limit"
            );
            OrderType::Limit
        });

        let order = OrderData {
            symbol: data.security_id.clone(),
            exchange: contract.exchange,
            orderid: self.resolve_orderid(data.cl_ord_id, &data.order_id),
            order_type,
            direction,
            offset: offset_from_stock(data.position_effect).unwrap_or(Offset::None),
            price: data.price,
            volume: data.order_qty,
            traded: data.trade_qty,
            status,
            datetime: self.timestamp(data.transact_time_only),
            reference: String::new(),
            gateway_name: self.gateway_name().to_string(),
        };

        if order.is_active() {
            if let Some(tracked) = self.orders.get_mut(&data.cl_ord_id) {
                *tracked = order.clone();
            }
        } else {
            self.orders.remove(&data.cl_ord_id);
        }
        self.emitter.publish(GatewayEvent::Order(order));
    }

    fn process_trade(&mut self, data: &OptionsTradeField) {
        let Some(contract) = self.directory.lookup(&data.security_id) else {
            tracing::warn!(gateway = %self.gateway_name(), symbol = %data.security_id, "trade push for unknown contract skipped");
            return;
        };
        let Some(direction) = direction_from_stock(data.side) else {
            tracing::warn!(gateway = %self.gateway_name(), code = %data.side, "trade push with unknown side skipped");
            return;
        };

        let trade = TradeData {
            symbol: data.security_id.clone(),
            exchange: contract.exchange,
            orderid: self.resolve_orderid(data.cl_ord_id, &data.order_id),
            tradeid: data.exec_id.clone(),
            direction,
            offset: offset_from_stock(data.position_effect).unwrap_or(Offset::None),
            price: data.last_px,
            volume: data.last_qty,
            datetime: self.timestamp(data.transact_time_only),
            gateway_name: self.gateway_name().to_string(),
        };
        self.emitter.publish(GatewayEvent::Trade(trade));
    }

    fn on_exercise_record(&mut self, data: &ExerciseRecordField, info: &RspInfo, active: bool) {
        if info.is_error() {
            tracing::warn!(gateway = %self.gateway_name(), error_id = info.error_id, "exercise request failed: {}", info.error_msg);
            self.emitter
                .publish(GatewayEvent::ExerciseLog(info.error_msg.clone()));
            return;
        }
        self.emitter.publish(GatewayEvent::Exercise(ExerciseData {
            orderid: data.order_id.clone(),
            volume: data.order_qty,
            active,
            leg1_symbol: data.security_id.clone(),
            leg2_symbol: None,
        }));
    }

    fn on_comb_exercise(&mut self, data: &CombExerciseRecordField, info: &RspInfo) {
        if info.is_error() {
            tracing::warn!(gateway = %self.gateway_name(), error_id = info.error_id, "combination exercise failed: {}", info.error_msg);
            self.emitter
                .publish(GatewayEvent::ExerciseLog(info.error_msg.clone()));
            return;
        }
        self.emitter.publish(GatewayEvent::Exercise(ExerciseData {
            orderid: data.order_id.clone(),
            volume: data.order_qty,
            active: true,
            leg1_symbol: data.leg_security_id1.clone(),
            leg2_symbol: Some(data.leg_security_id2.clone()),
        }));
    }

    fn send(&mut self, request: OptionsRequest) {
        let id = self.reqs.next_id();
        if let Err(e) = self.api.send(request, id) {
            tracing::warn!(gateway = %self.gateway_name(), request_id = id, "stock-option request not sent: {e}");
        }
    }
}

/// Build an option contract, or `None` for blank ids and unmapped call/put codes.
pub(crate) fn contract_from_option(data: &OptionInstrumentField, gateway_name: &str) -> Option<ContractData> {
    if data.contract_id.is_empty() {
        return None;
    }
    let Some(option_type) = option_type_from_stock(data.call_or_put) else {
        tracing::debug!(symbol = %data.contract_id, code = %data.call_or_put, "unmapped call/put code skipped");
        return None;
    };

    Some(ContractData {
        symbol: data.contract_id.clone(),
        exchange: stock_option_exchange(&data.contract_id),
        name: data.contract_symbol.clone(),
        product: Product::Option,
        size: data.contract_multiplier_unit,
        pricetick: data.tick_size,
        option: Some(OptionDetails {
            portfolio: data.underlying_security_id.clone(),
            underlying: format!("{}_{}", data.underlying_security_id, data.expire_date),
            option_type: Some(option_type),
            strike: data.exercise_price,
            expiry: time::parse_compact_date(&data.expire_date),
            index: option_index(data.exercise_price, &data.contract_symbol),
        }),
        gateway_name: gateway_name.to_string(),
    })
}
