//! Market-data session.
//!
//! ```text
//! Disconnected ──connect──► Connected ──front connected──► Authenticating ──login ok──► Ready
//!      ▲                                                        │ login refused
//!      └──────────────────── front disconnected ◄───────────────┴──► Connected
//! ```
//!
//! Subscriptions are remembered regardless of state and replayed on every
//! successful login.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tgw_directory::SharedDirectory;
use tgw_protocol::mapping::md_subscribe_key;
use tgw_protocol::md::{MarketDataField, MdCallback, MdRequest, UtpLoginField};
use tgw_protocol::{NativeApi, RequestSeq};
use tgw_schemas::{ConnectSettings, ContractData, GatewayEvent, SubscribeRequest, TickData, BOOK_DEPTH};

use crate::sink::{Emitter, EventSink};
use crate::time;

/// The feed's "no value" price.
const NO_PRICE: f64 = f64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdState {
    Disconnected,
    Connected,
    Authenticating,
    Ready,
}

#[derive(Debug, Clone, Default)]
struct MdCredentials {
    user_id: String,
    password: String,
    dev_code: String,
    dev_license: String,
}

pub struct MdSession<A: NativeApi<MdRequest>> {
    api: A,
    emitter: Emitter,
    directory: SharedDirectory,
    reqs: RequestSeq,
    state: MdState,
    /// Independent of `state`: a front disconnect leaves the transport open.
    transport_open: bool,
    credentials: MdCredentials,
    subscribed: BTreeSet<String>,
    current_date: NaiveDate,
}

impl<A: NativeApi<MdRequest>> MdSession<A> {
    pub fn new(
        api: A,
        directory: SharedDirectory,
        sink: Arc<dyn EventSink>,
        gateway_name: impl Into<String>,
    ) -> Self {
        Self {
            api,
            emitter: Emitter::new(gateway_name, sink),
            directory,
            reqs: RequestSeq::new(),
            state: MdState::Disconnected,
            transport_open: false,
            credentials: MdCredentials::default(),
            subscribed: BTreeSet::new(),
            current_date: time::china_today(),
        }
    }

    pub fn state(&self) -> MdState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state != MdState::Disconnected
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == MdState::Ready
    }

    /// Keys recorded by [`MdSession::subscribe`], in key order.
    pub fn subscriptions(&self) -> impl Iterator<Item = &str> {
        self.subscribed.iter().map(String::as_str)
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Date used to stamp ticks; refreshed by the host timer.
    pub fn update_date(&mut self, date: NaiveDate) {
        self.current_date = date;
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Open the transport if needed, or retry login on an open but
    /// unauthenticated transport.
    pub fn connect(&mut self, address: &str, settings: &ConnectSettings) {
        self.credentials = MdCredentials {
            user_id: settings.md_user.clone(),
            password: settings.md_password.clone(),
            dev_code: settings.dev_code.clone(),
            dev_license: settings.dev_license.clone(),
        };

        if !self.transport_open {
            tracing::info!(gateway = %self.emitter.gateway_name(), address, "opening market data transport");
            self.api.open(address);
            self.transport_open = true;
            self.state = MdState::Connected;
            return;
        }
        match self.state {
            MdState::Disconnected | MdState::Connected | MdState::Authenticating => self.login(),
            MdState::Ready => {}
        }
    }

    pub fn subscribe(&mut self, req: &SubscribeRequest) {
        let key = md_subscribe_key(req);
        if self.state == MdState::Ready {
            self.send_subscribe(&key);
        }
        self.subscribed.insert(key);
    }

    pub fn close(&mut self) {
        if self.transport_open {
            self.api.close();
            self.transport_open = false;
        }
        self.state = MdState::Disconnected;
    }

    pub fn handle(&mut self, callback: MdCallback) {
        match callback {
            MdCallback::FrontConnected => {
                self.emitter.write_log("market data server connected");
                self.login();
            }
            MdCallback::FrontDisconnected => {
                self.state = MdState::Disconnected;
                self.emitter.write_log("market data server disconnected");
            }
            MdCallback::RspError { error_message, .. } => {
                self.emitter
                    .write_log(format!("market data API error: {error_message}"));
            }
            MdCallback::RspUtpLogin {
                response_code,
                response_string,
                ..
            } => self.on_login(response_code, &response_string),
            MdCallback::RspSubscribe {
                response_code,
                response_string,
                ..
            } => {
                if response_code != 0 {
                    self.emitter.write_log(format!(
                        "market data subscribe failed: {response_string}"
                    ));
                }
            }
            MdCallback::RtnMarketData { data } => self.on_market_data(&data),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn login(&mut self) {
        let req = UtpLoginField {
            developer_code: self.credentials.dev_code.clone(),
            developer_license: self.credentials.dev_license.clone(),
            user_id: self.credentials.user_id.clone(),
            user_password: self.credentials.password.clone(),
        };
        self.state = MdState::Authenticating;
        let id = self.reqs.next_id();
        if let Err(e) = self.api.send(MdRequest::UtpLogin(req), id) {
            tracing::warn!(gateway = %self.emitter.gateway_name(), request_id = id, "md login not sent: {e}");
        }
    }

    fn send_subscribe(&mut self, key: &str) {
        let id = self.reqs.next_id();
        if let Err(e) = self.api.send(MdRequest::Subscribe { key: key.to_string() }, id) {
            tracing::warn!(gateway = %self.emitter.gateway_name(), request_id = id, key, "subscribe not sent: {e}");
        }
    }

    fn on_login(&mut self, response_code: i32, response_string: &str) {
        if response_code != 0 {
            self.state = MdState::Connected;
            self.emitter
                .write_log(format!("market data login failed: {response_string}"));
            return;
        }

        self.state = MdState::Ready;
        self.emitter.write_log("market data server login succeeded");

        let keys: Vec<String> = self.subscribed.iter().cloned().collect();
        tracing::debug!(gateway = %self.emitter.gateway_name(), count = keys.len(), "replaying subscriptions");
        for key in keys {
            self.send_subscribe(&key);
        }
    }

    fn on_market_data(&mut self, data: &MarketDataField) {
        let Some(contract) = self.directory.lookup(&data.instrument_id) else {
            return;
        };
        match normalize_tick(data, &contract, self.current_date, self.emitter.gateway_name()) {
            Some(tick) => self.emitter.publish(GatewayEvent::Tick(tick)),
            None => tracing::warn!(
                gateway = %self.emitter.gateway_name(),
                symbol = %data.instrument_id,
                update_time = %data.update_time,
                "dropping tick with unparseable time"
            ),
        }
    }
}

/// Sentinel `f64::MAX` becomes 0.
pub(crate) fn adjust_price(price: f64) -> f64 {
    if price == NO_PRICE {
        0.0
    } else {
        price
    }
}

pub(crate) fn normalize_tick(
    data: &MarketDataField,
    contract: &ContractData,
    date: NaiveDate,
    gateway_name: &str,
) -> Option<TickData> {
    let time = NaiveTime::parse_from_str(data.update_time.trim(), "%H:%M:%S").ok()?;
    let millis = i64::from(data.update_millisec / 100) * 100;
    let naive = date.and_time(time) + Duration::milliseconds(millis);
    let datetime = time::localize(naive)?;

    let mut tick = TickData {
        symbol: data.instrument_id.clone(),
        exchange: contract.exchange,
        datetime,
        name: contract.name.clone(),
        volume: data.volume,
        open_interest: data.open_interest,
        last_price: data.last_price,
        limit_up: data.upper_limit_price,
        limit_down: data.lower_limit_price,
        open_price: adjust_price(data.open_price),
        high_price: adjust_price(data.highest_price),
        low_price: adjust_price(data.lowest_price),
        pre_close: adjust_price(data.pre_close_price),
        bid_price: [0.0; BOOK_DEPTH],
        ask_price: [0.0; BOOK_DEPTH],
        bid_volume: [0; BOOK_DEPTH],
        ask_volume: [0; BOOK_DEPTH],
        gateway_name: gateway_name.to_string(),
    };

    let depth = if data.bid_volume[1] != 0 || data.ask_volume[1] != 0 {
        BOOK_DEPTH
    } else {
        1
    };
    for level in 0..depth {
        tick.bid_price[level] = adjust_price(data.bid_price[level]);
        tick.ask_price[level] = adjust_price(data.ask_price[level]);
        tick.bid_volume[level] = data.bid_volume[level];
        tick.ask_volume[level] = data.ask_volume[level];
    }

    Some(tick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{futures_contract, CollectSink, FakeApi};
    use chrono::Timelike;
    use tgw_directory::ContractDirectory;
    use tgw_schemas::Exchange;

    fn session() -> (MdSession<FakeApi<MdRequest>>, Arc<CollectSink>, SharedDirectory) {
        let sink = Arc::new(CollectSink::default());
        let dir = ContractDirectory::shared();
        let s = MdSession::new(FakeApi::default(), Arc::clone(&dir), sink.clone(), "MD");
        (s, sink, dir)
    }

    fn subscribe_keys(api: &FakeApi<MdRequest>) -> Vec<String> {
        api.sent()
            .into_iter()
            .filter_map(|(r, _)| match r {
                MdRequest::Subscribe { key } => Some(key),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn connect_opens_once_then_retries_login() {
        let (mut s, _, _) = session();
        let settings = ConnectSettings {
            md_user: "mduser".into(),
            ..Default::default()
        };
        s.connect("tcp://md:1", &settings);
        assert_eq!(s.api().opened(), vec!["tcp://md:1".to_string()]);
        assert!(s.api().sent().is_empty());

        s.connect("tcp://md:1", &settings);
        assert_eq!(s.api().opened().len(), 1);
        assert!(matches!(s.api().sent()[0].0, MdRequest::UtpLogin(ref f) if f.user_id == "mduser"));
    }

    #[test]
    fn subscribe_before_login_is_deferred_and_replayed_once() {
        let (mut s, _, _) = session();
        s.connect("tcp://md:1", &ConnectSettings::default());
        let req = SubscribeRequest::new("rb2410", Exchange::SHFE);
        s.subscribe(&req);
        s.subscribe(&req);
        assert!(subscribe_keys(s.api()).is_empty());

        s.handle(MdCallback::FrontConnected);
        s.handle(MdCallback::RspUtpLogin {
            response_code: 0,
            response_string: String::new(),
            meta: Default::default(),
        });
        assert_eq!(subscribe_keys(s.api()), vec!["SHFE.rb2410".to_string()]);
        assert!(s.is_authenticated());
    }

    #[test]
    fn disconnect_resets_flags() {
        let (mut s, _, _) = session();
        s.connect("tcp://md:1", &ConnectSettings::default());
        s.handle(MdCallback::FrontConnected);
        s.handle(MdCallback::RspUtpLogin {
            response_code: 0,
            response_string: String::new(),
            meta: Default::default(),
        });
        s.handle(MdCallback::FrontDisconnected);
        assert!(!s.is_connected());
        assert!(!s.is_authenticated());
    }

    #[test]
    fn close_after_front_disconnect_releases_transport() {
        let (mut s, _, _) = session();
        s.connect("tcp://md:1", &ConnectSettings::default());
        s.handle(MdCallback::FrontConnected);
        s.handle(MdCallback::FrontDisconnected);
        s.close();
        assert!(s.api().closed());

        s.connect("tcp://md:1", &ConnectSettings::default());
        assert_eq!(s.api().opened().len(), 2);
    }

    #[test]
    fn connect_after_front_disconnect_reuses_transport() {
        let (mut s, _, _) = session();
        s.connect("tcp://md:1", &ConnectSettings::default());
        s.handle(MdCallback::FrontDisconnected);
        s.connect("tcp://md:1", &ConnectSettings::default());
        assert_eq!(s.api().opened().len(), 1);
        assert!(matches!(s.api().sent()[0].0, MdRequest::UtpLogin(_)));
    }

    #[test]
    fn unknown_contract_tick_is_dropped() {
        let (mut s, sink, _) = session();
        s.handle(MdCallback::RtnMarketData {
            data: MarketDataField {
                instrument_id: "zz9999".into(),
                update_time: "09:30:00".into(),
                ..Default::default()
            },
        });
        assert!(sink.events().is_empty());
    }

    #[test]
    fn tick_time_truncates_to_hundred_millis() {
        let contract = futures_contract("rb2410", Exchange::SHFE, 10.0);
        let data = MarketDataField {
            instrument_id: "rb2410".into(),
            update_time: "21:05:09".into(),
            update_millisec: 580,
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let tick = normalize_tick(&data, &contract, date, "MD").unwrap();
        assert_eq!(tick.datetime.hour(), 21);
        assert_eq!(tick.datetime.nanosecond(), 500_000_000);
    }

    #[test]
    fn level_two_absent_keeps_single_level() {
        let contract = futures_contract("rb2410", Exchange::SHFE, 10.0);
        let data = MarketDataField {
            instrument_id: "rb2410".into(),
            update_time: "09:00:00".into(),
            bid_price: [3500.0, 3499.0, 3498.0, 3497.0, 3496.0],
            bid_volume: [5, 0, 7, 7, 7],
            ask_price: [3501.0, NO_PRICE, 3503.0, 3504.0, 3505.0],
            ask_volume: [4, 0, 1, 1, 1],
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let tick = normalize_tick(&data, &contract, date, "MD").unwrap();
        assert_eq!(tick.bid_price[0], 3500.0);
        assert_eq!(tick.bid_price[1], 0.0);
        assert_eq!(tick.bid_volume[2], 0);
        assert_eq!(tick.ask_volume[0], 4);
    }
}
