//! Futures session state machine.
//!
//! ```text
//! Disconnected ─front connected─► Connected ─auth ok─► Authenticated ─login ok─► LoggedIn
//!                                     └──────── (no auth code) ─────────────────────┘
//! LoggedIn ─settlement confirmed─► SettlementConfirmed ─last contract page─► ContractsLoaded
//! ```
//!
//! Order and trade pushes received before `ContractsLoaded` are held in a
//! [`ReplayBuffer`] and replayed once after the last contract page.
//!
//! A refused login sets `login_failed` for the rest of the process lifetime;
//! no further login is attempted.

use std::collections::HashMap;
use std::sync::Arc;

use tgw_directory::SharedDirectory;
use tgw_protocol::codes::futures as codes;
use tgw_protocol::futures::{
    AuthenticateField, FuturesCallback, FuturesRequest, InputForQuoteField, InputOrderActionField,
    InputOrderField, InstrumentField, InvestorField, InvestorPositionField, OrderField,
    RspUserLoginField, SettlementInfoConfirmField, TradeField, TradingAccountField, UserLoginField,
};
use tgw_protocol::mapping::{
    direction_from_futures, direction_to_futures, exchange_from_futures, offset_from_futures,
    offset_to_futures, option_type_from_futures, order_type_from_futures, order_type_to_futures,
    price_repr, product_from_futures, status_from_futures, FuturesOrderKind,
};
use tgw_protocol::{NativeApi, RequestSeq, RspInfo, RspMeta, ValidationError};
use tgw_schemas::{
    AccountData, CancelRequest, ConnectSettings, ContractData, Exchange, GatewayEvent, Offset,
    OptionDetails, OrderData, OrderRequest, OrderType, Product, Status, TradeData,
};

use super::{FuturesOrderId, PositionAccumulator};
use crate::replay::ReplayBuffer;
use crate::retry::RetryPolicy;
use crate::sink::{Emitter, EventSink};
use crate::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuturesState {
    Disconnected,
    Connected,
    Authenticated,
    LoggedIn,
    SettlementConfirmed,
    ContractsLoaded,
}

#[derive(Debug, Clone, Default)]
struct Credentials {
    user_id: String,
    password: String,
    broker_id: String,
    auth_code: String,
    app_id: String,
    product_info: String,
}

pub struct FuturesSession<A: NativeApi<FuturesRequest>> {
    api: A,
    emitter: Emitter,
    directory: SharedDirectory,
    reqs: RequestSeq,
    retry: RetryPolicy,

    state: FuturesState,
    transport_open: bool,
    login_failed: bool,
    credentials: Credentials,

    front_id: i32,
    session_id: i32,
    order_ref: u64,

    pending: ReplayBuffer<OrderField, TradeField>,
    positions: PositionAccumulator,
    sysid_orderid: HashMap<String, FuturesOrderId>,
}

impl<A: NativeApi<FuturesRequest>> FuturesSession<A> {
    pub fn new(
        api: A,
        directory: SharedDirectory,
        sink: Arc<dyn EventSink>,
        gateway_name: impl Into<String>,
    ) -> Self {
        let gateway_name = gateway_name.into();
        Self {
            api,
            emitter: Emitter::new(gateway_name.clone(), sink),
            directory,
            reqs: RequestSeq::new(),
            retry: RetryPolicy::default(),
            state: FuturesState::Disconnected,
            transport_open: false,
            login_failed: false,
            credentials: Credentials::default(),
            front_id: 0,
            session_id: 0,
            order_ref: 0,
            pending: ReplayBuffer::new(),
            positions: PositionAccumulator::new(gateway_name),
            sysid_orderid: HashMap::new(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn state(&self) -> FuturesState {
        self.state
    }

    pub fn login_failed(&self) -> bool {
        self.login_failed
    }

    pub fn contracts_loaded(&self) -> bool {
        self.pending.is_released()
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

    /// Open the transport on first call; later calls restart authentication.
    pub fn connect(&mut self, address: &str, settings: &ConnectSettings) {
        self.credentials = Credentials {
            user_id: settings.user_id.clone(),
            password: settings.password.clone(),
            broker_id: settings.party_id.clone(),
            auth_code: settings.auth_code.clone(),
            app_id: settings.app_id.clone(),
            product_info: String::new(),
        };

        if !self.transport_open {
            tracing::info!(gateway = %self.gateway_name(), address, "opening futures trading transport");
            self.api.open(address);
            self.transport_open = true;
        } else {
            self.authenticate_or_login();
        }
    }

    pub fn send_order(&mut self, req: &OrderRequest) -> Result<String, ValidationError> {
        let checked = offset_to_futures(req.offset)
            .ok_or(ValidationError::UnsupportedOffset(req.offset))
            .and_then(|offset| {
                order_type_to_futures(req.order_type)
                    .map(|kind| (offset, kind))
                    .ok_or(ValidationError::UnsupportedOrderType(req.order_type))
            });
        let (offset, kind) = match checked {
            Ok(v) => v,
            Err(e) => {
                self.emitter.write_log(e.to_string());
                return Err(e);
            }
        };

        self.order_ref += 1;
        let order_ref = self.order_ref.to_string();
        let field = InputOrderField {
            instrument_id: req.symbol.clone(),
            exchange_id: req.exchange.to_string(),
            limit_price: req.price,
            volume_total_original: req.volume,
            order_price_type: kind.price_type,
            direction: direction_to_futures(req.direction),
            comb_offset_flag: offset,
            order_ref: order_ref.clone(),
            investor_id: self.credentials.user_id.clone(),
            user_id: self.credentials.user_id.clone(),
            broker_id: self.credentials.broker_id.clone(),
            comb_hedge_flag: codes::HF_SPECULATION,
            contingent_condition: codes::CC_IMMEDIATELY,
            force_close_reason: codes::FCC_NOT_FORCE_CLOSE,
            is_auto_suspend: 0,
            time_condition: kind.time_condition,
            volume_condition: kind.volume_condition,
            min_volume: 1,
        };
        self.send(FuturesRequest::OrderInsert(field));

        let orderid = FuturesOrderId::new(self.front_id, self.session_id, order_ref);
        let order = req.create_order_data(orderid.to_string(), self.gateway_name());
        let vt_orderid = order.vt_orderid();
        self.emitter.publish(GatewayEvent::Order(order));
        Ok(vt_orderid)
    }

    pub fn cancel_order(&mut self, req: &CancelRequest) -> Result<(), ValidationError> {
        let id: FuturesOrderId = match req.orderid.parse() {
            Ok(id) => id,
            Err(e) => {
                self.emitter.write_log(format!("cancel not sent: {e}"));
                return Err(e);
            }
        };
        let field = InputOrderActionField {
            instrument_id: req.symbol.clone(),
            exchange_id: req.exchange.to_string(),
            order_ref: id.order_ref,
            front_id: id.front_id,
            session_id: id.session_id,
            action_flag: codes::AF_DELETE,
            broker_id: self.credentials.broker_id.clone(),
            investor_id: self.credentials.user_id.clone(),
        };
        self.send(FuturesRequest::OrderAction(field));
        Ok(())
    }

    /// Request-for-quote. Consumes an order ref; returns the vt id it was sent under.
    pub fn send_rfq(&mut self, req: &OrderRequest) -> String {
        self.order_ref += 1;
        let order_ref = self.order_ref.to_string();
        let field = InputForQuoteField {
            instrument_id: req.symbol.clone(),
            exchange_id: req.exchange.to_string(),
            for_quote_ref: order_ref.clone(),
            broker_id: self.credentials.broker_id.clone(),
            investor_id: self.credentials.user_id.clone(),
        };
        self.send(FuturesRequest::ForQuoteInsert(field));

        let orderid = FuturesOrderId::new(self.front_id, self.session_id, order_ref);
        format!("{}.{}", self.gateway_name(), orderid)
    }

    pub fn query_account(&mut self) {
        self.send(FuturesRequest::QryTradingAccount);
    }

    /// No-op until at least one contract is known.
    pub fn query_position(&mut self) {
        if self.directory.is_empty() {
            return;
        }
        let field = InvestorField {
            broker_id: self.credentials.broker_id.clone(),
            investor_id: self.credentials.user_id.clone(),
        };
        self.send(FuturesRequest::QryInvestorPosition(field));
    }

    pub fn close(&mut self) {
        if self.transport_open {
            self.api.close();
            self.transport_open = false;
            self.state = FuturesState::Disconnected;
        }
    }

    // -----------------------------------------------------------------------
    // Callback dispatch
    // -----------------------------------------------------------------------

    pub fn handle(&mut self, callback: FuturesCallback) {
        match callback {
            FuturesCallback::FrontConnected => {
                self.state = FuturesState::Connected;
                self.emitter.write_log("trade server connected");
                self.authenticate_or_login();
            }
            FuturesCallback::FrontDisconnected { reason } => {
                self.state = FuturesState::Disconnected;
                self.emitter
                    .write_log(format!("trade server disconnected, reason {reason}"));
            }
            FuturesCallback::RspAuthenticate { info, .. } => self.on_authenticate(&info),
            FuturesCallback::RspUserLogin { data, info, .. } => self.on_login(&data, &info),
            FuturesCallback::RspSettlementInfoConfirm { info, .. } => {
                self.on_settlement_confirmed(&info)
            }
            FuturesCallback::RspQryInstrument { data, meta, .. } => {
                self.on_instrument(data.as_ref(), meta)
            }
            FuturesCallback::RspQryInvestorPosition { data, meta, .. } => {
                self.on_position(data.as_ref(), meta)
            }
            FuturesCallback::RspQryTradingAccount { data, .. } => self.on_account(&data),
            FuturesCallback::RspOrderInsert { data, info, .. } => {
                self.on_order_insert_error(&data, &info)
            }
            FuturesCallback::RspOrderAction { info, .. } => {
                if info.is_error() {
                    self.emitter.write_error("order cancel failed", &info);
                }
            }
            FuturesCallback::RspForQuoteInsert { data, info, .. } => {
                if info.is_error() {
                    self.emitter.write_error("quote request failed", &info);
                } else {
                    self.emitter
                        .write_log(format!("{} quote request sent", data.instrument_id));
                }
            }
            FuturesCallback::RtnOrder { data } => {
                if let Some(data) = self.pending.admit_order(data) {
                    self.process_order(&data);
                }
            }
            FuturesCallback::RtnTrade { data } => {
                if let Some(data) = self.pending.admit_trade(data) {
                    self.process_trade(&data);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Connect / login pipeline
    // -----------------------------------------------------------------------

    fn authenticate_or_login(&mut self) {
        if self.credentials.auth_code.is_empty() {
            self.login();
        } else {
            self.authenticate();
        }
    }

    fn product_info(&self) -> Option<String> {
        Some(self.credentials.product_info.clone()).filter(|s| !s.is_empty())
    }

    fn authenticate(&mut self) {
        let field = AuthenticateField {
            user_id: self.credentials.user_id.clone(),
            broker_id: self.credentials.broker_id.clone(),
            auth_code: self.credentials.auth_code.clone(),
            app_id: self.credentials.app_id.clone(),
            user_product_info: self.product_info(),
        };
        self.send(FuturesRequest::Authenticate(field));
    }

    fn login(&mut self) {
        if self.login_failed {
            tracing::debug!(gateway = %self.gateway_name(), "login suppressed after earlier failure");
            return;
        }
        let field = UserLoginField {
            user_id: self.credentials.user_id.clone(),
            password: self.credentials.password.clone(),
            broker_id: self.credentials.broker_id.clone(),
            app_id: self.credentials.app_id.clone(),
            user_product_info: self.product_info(),
        };
        self.send(FuturesRequest::UserLogin(field));
    }

    fn on_authenticate(&mut self, info: &RspInfo) {
        if info.is_error() {
            self.emitter
                .write_error("trade server authentication failed", info);
            return;
        }
        self.state = FuturesState::Authenticated;
        self.emitter.write_log("trade server authenticated");
        self.login();
    }

    fn on_login(&mut self, data: &RspUserLoginField, info: &RspInfo) {
        if info.is_error() {
            self.login_failed = true;
            self.emitter.write_error("trade server login failed", info);
            return;
        }

        self.front_id = data.front_id;
        self.session_id = data.session_id;
        self.state = FuturesState::LoggedIn;
        self.emitter.write_log("trade server login succeeded");
        tracing::debug!(
            gateway = %self.gateway_name(),
            front_id = data.front_id,
            session_id = data.session_id,
            "session identity captured"
        );

        let field = SettlementInfoConfirmField {
            investor_id: self.credentials.user_id.clone(),
        };
        self.send(FuturesRequest::SettlementInfoConfirm(field));
    }

    fn on_settlement_confirmed(&mut self, info: &RspInfo) {
        if info.is_error() {
            // Reference data is still needed to release buffered pushes.
            self.emitter
                .write_error("settlement confirmation failed", info);
        } else {
            self.state = FuturesState::SettlementConfirmed;
            self.emitter.write_log("settlement info confirmed");
        }
        self.query_contracts();
    }

    /// Instrument queries are rate limited; a refused send is retried with backoff.
    fn query_contracts(&mut self) {
        let retry = self.retry;
        let api = &mut self.api;
        let reqs = &mut self.reqs;
        let outcome = retry.run(|| {
            let id = reqs.next_id();
            api.send(FuturesRequest::QryInstrument, id)
        });
        match outcome {
            Ok(attempts) => {
                tracing::debug!(gateway = %self.gateway_name(), attempts, "contract query accepted")
            }
            Err(e) => {
                tracing::error!(gateway = %self.gateway_name(), attempts = e.attempts, "contract query abandoned");
                self.emitter.write_log(format!(
                    "contract query abandoned after {} attempts",
                    e.attempts
                ));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Query responses
    // -----------------------------------------------------------------------

    fn on_instrument(&mut self, data: Option<&InstrumentField>, meta: RspMeta) {
        if let Some(contract) = data.and_then(|d| contract_from_instrument(d, self.gateway_name())) {
            self.emitter.publish(GatewayEvent::Contract(contract.clone()));
            self.directory.register(contract);
        }

        if !meta.is_last {
            return;
        }

        self.state = FuturesState::ContractsLoaded;
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

    fn on_position(&mut self, data: Option<&InvestorPositionField>, meta: RspMeta) {
        if let Some(rec) = data {
            match self.directory.lookup(&rec.instrument_id) {
                Some(contract) => {
                    if !self.positions.merge(rec, &contract) {
                        tracing::warn!(
                            gateway = %self.gateway_name(),
                            symbol = %rec.instrument_id,
                            code = %rec.posi_direction,
                            "position record with unknown direction skipped"
                        );
                    }
                }
                None => tracing::debug!(
                    gateway = %self.gateway_name(),
                    symbol = %rec.instrument_id,
                    "position for unknown contract skipped"
                ),
            }
        }

        if meta.is_last {
            for position in self.positions.drain() {
                self.emitter.publish(GatewayEvent::Position(position));
            }
        }
    }

    fn on_account(&mut self, data: &TradingAccountField) {
        if data.account_id.is_empty() {
            return;
        }
        let account = AccountData {
            accountid: data.account_id.clone(),
            balance: data.balance,
            frozen: data.frozen_margin + data.frozen_cash + data.frozen_commission,
            available: data.available,
            gateway_name: self.gateway_name().to_string(),
        };
        self.emitter.publish(GatewayEvent::Account(account));
    }

    // -----------------------------------------------------------------------
    // Order / trade reconciliation
    // -----------------------------------------------------------------------

    /// The broker refused an insert before any order push existed; report the
    /// echoed request as a terminal rejection.
    fn on_order_insert_error(&mut self, data: &InputOrderField, info: &RspInfo) {
        let exchange = self
            .directory
            .lookup(&data.instrument_id)
            .map(|c| c.exchange)
            .or_else(|| exchange_from_futures(&data.exchange_id));

        match (exchange, direction_from_futures(data.direction)) {
            (Some(exchange), Some(direction)) => {
                let orderid = FuturesOrderId::new(self.front_id, self.session_id, data.order_ref.clone());
                let order = OrderData {
                    symbol: data.instrument_id.clone(),
                    exchange,
                    orderid: orderid.to_string(),
                    order_type: self.order_type_or_limit(FuturesOrderKind {
                        price_type: data.order_price_type,
                        time_condition: data.time_condition,
                        volume_condition: data.volume_condition,
                    }),
                    direction,
                    offset: offset_from_futures(data.comb_offset_flag).unwrap_or(Offset::None),
                    price: data.limit_price,
                    volume: data.volume_total_original,
                    traded: 0,
                    status: Status::Rejected,
                    datetime: None,
                    reference: String::new(),
                    gateway_name: self.gateway_name().to_string(),
                };
                self.emitter.publish(GatewayEvent::Order(order));
            }
            _ => tracing::warn!(
                gateway = %self.gateway_name(),
                symbol = %data.instrument_id,
                "rejected insert could not be mapped to an order"
            ),
        }

        self.emitter.write_error("order insert failed", info);
    }

    fn order_type_or_limit(&self, kind: FuturesOrderKind) -> OrderType {
        order_type_from_futures(kind).unwrap_or_else(|| {
            tracing::debug!(gateway = %self.gateway_name(), ?kind, "unmapped order type, reporting as limit");
            OrderType::Limit
        })
    }

    fn process_order(&mut self, data: &OrderField) {
        let Some(contract) = self.directory.lookup(&data.instrument_id) else {
            tracing::warn!(gateway = %self.gateway_name(), symbol = %data.instrument_id, "order push for unknown contract skipped");
            return;
        };
        let Some(status) = status_from_futures(data.order_status) else {
            tracing::warn!(gateway = %self.gateway_name(), code = %data.order_status, "order push with unknown status skipped");
            return;
        };
        let Some(direction) = direction_from_futures(data.direction) else {
            tracing::warn!(gateway = %self.gateway_name(), code = %data.direction, "order push with unknown direction skipped");
            return;
        };

        let orderid = FuturesOrderId::new(data.front_id, data.session_id, data.order_ref.clone());
        let order = OrderData {
            symbol: data.instrument_id.clone(),
            exchange: contract.exchange,
            orderid: orderid.to_string(),
            order_type: self.order_type_or_limit(FuturesOrderKind {
                price_type: data.order_price_type,
                time_condition: data.time_condition,
                volume_condition: data.volume_condition,
            }),
            direction,
            offset: offset_from_futures(data.comb_offset_flag).unwrap_or(Offset::None),
            price: data.limit_price,
            volume: data.volume_total_original,
            traded: data.volume_traded,
            status,
            datetime: time::parse_date_time(&data.insert_date, &data.insert_time),
            reference: String::new(),
            gateway_name: self.gateway_name().to_string(),
        };
        self.emitter.publish(GatewayEvent::Order(order));

        if !data.order_sys_id.is_empty() {
            self.sysid_orderid.insert(data.order_sys_id.clone(), orderid);
        }
    }

    fn process_trade(&mut self, data: &TradeField) {
        let Some(contract) = self.directory.lookup(&data.instrument_id) else {
            tracing::warn!(gateway = %self.gateway_name(), symbol = %data.instrument_id, "trade push for unknown contract skipped");
            return;
        };
        let Some(direction) = direction_from_futures(data.direction) else {
            tracing::warn!(gateway = %self.gateway_name(), code = %data.direction, "trade push with unknown direction skipped");
            return;
        };

        let orderid = match self.sysid_orderid.get(&data.order_sys_id) {
            Some(id) => id.to_string(),
            None => {
                tracing::warn!(
                    gateway = %self.gateway_name(),
                    sysid = %data.order_sys_id,
                    trade_id = %data.trade_id,
                    "trade for unmapped exchange order id"
                );
                data.order_sys_id.clone()
            }
        };

        let trade = TradeData {
            symbol: data.instrument_id.clone(),
            exchange: contract.exchange,
            orderid,
            tradeid: data.trade_id.clone(),
            direction,
            offset: offset_from_futures(data.offset_flag).unwrap_or(Offset::None),
            price: data.price,
            volume: data.volume,
            datetime: time::parse_date_time(&data.trade_date, &data.trade_time),
            gateway_name: self.gateway_name().to_string(),
        };
        self.emitter.publish(GatewayEvent::Trade(trade));
    }

    fn send(&mut self, request: FuturesRequest) {
        let id = self.reqs.next_id();
        if let Err(e) = self.api.send(request, id) {
            tracing::warn!(gateway = %self.gateway_name(), request_id = id, "futures request not sent: {e}");
        }
    }
}

/// Build a contract from an instrument record, or `None` for product
/// classes and venues the gateway does not carry.
pub(crate) fn contract_from_instrument(data: &InstrumentField, gateway_name: &str) -> Option<ContractData> {
    let Some(product) = product_from_futures(data.product_class) else {
        tracing::debug!(symbol = %data.instrument_id, class = %data.product_class, "unmapped product class skipped");
        return None;
    };
    let Some(exchange) = exchange_from_futures(&data.exchange_id) else {
        tracing::debug!(symbol = %data.instrument_id, exchange = %data.exchange_id, "unmapped exchange skipped");
        return None;
    };

    let option = (product == Product::Option).then(|| {
        // CZCE option product ids carry a trailing C/P.
        let portfolio = if exchange == Exchange::CZCE {
            let mut p = data.product_id.clone();
            p.pop();
            p
        } else {
            data.product_id.clone()
        };
        OptionDetails {
            portfolio,
            underlying: data.underlying_instr_id.clone(),
            option_type: option_type_from_futures(data.options_type),
            strike: data.strike_price,
            expiry: time::parse_compact_date(&data.expire_date),
            index: price_repr(data.strike_price),
        }
    });

    Some(ContractData {
        symbol: data.instrument_id.clone(),
        exchange,
        name: data.instrument_name.clone(),
        product,
        size: data.volume_multiple,
        pricetick: data.price_tick,
        option,
        gateway_name: gateway_name.to_string(),
    })
}
