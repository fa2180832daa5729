use std::sync::{Arc, Mutex};
use std::time::Duration;

use tgw_directory::{ContractDirectory, SharedDirectory};
use tgw_protocol::futures::FuturesRequest;
use tgw_protocol::md::{MdCallback, MdRequest};
use tgw_protocol::options::OptionsRequest;
use tgw_protocol::{NativeApi, ValidationError};
use tgw_schemas::{CancelRequest, ConnectSettings, ExerciseRequest, OrderRequest, SubscribeRequest};
use tgw_session::options::seed_order_ref;
use tgw_session::{time, EventSink, FuturesSession, MdSession, OptionsSession, RetryPolicy};
use tokio::task::JoinHandle;

use crate::trading::TradingSession;

pub const FUTURES_GATEWAY_NAME: &str = "NHFUTURES";
pub const OPTIONS_GATEWAY_NAME: &str = "NHSTOCK";

/// Timer ticks between two round-robin queries.
pub const DEFAULT_QUERY_EVERY: u32 = 2;

const TRANSPORT_SCHEME: &str = "tcp://";

pub fn normalize_address(address: &str) -> String {
    if address.starts_with(TRANSPORT_SCHEME) {
        address.to_string()
    } else {
        format!("{TRANSPORT_SCHEME}{address}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeriodicQuery {
    Account,
    Position,
}

const ROTATION: [PeriodicQuery; 2] = [PeriodicQuery::Account, PeriodicQuery::Position];

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// One trading session plus one market-data session sharing a contract
/// directory.
pub struct Gateway<T: TradingSession, M: NativeApi<MdRequest>> {
    td: T,
    md: MdSession<M>,
    directory: SharedDirectory,

    query_every: u32,
    query_armed: bool,
    ticks: u32,
    next_query: usize,
}

pub type FuturesGateway<T, M> = Gateway<FuturesSession<T>, M>;
pub type OptionsGateway<T, M> = Gateway<OptionsSession<T>, M>;

impl<T: TradingSession, M: NativeApi<MdRequest>> Gateway<T, M> {
    /// `directory` must be the one both sessions were built with.
    pub fn new(td: T, md: MdSession<M>, directory: SharedDirectory) -> Self {
        Self {
            td,
            md,
            directory,
            query_every: DEFAULT_QUERY_EVERY,
            query_armed: false,
            ticks: 0,
            next_query: 0,
        }
    }

    pub fn with_query_every(mut self, ticks: u32) -> Self {
        self.query_every = ticks.max(1);
        self
    }

    pub fn td(&self) -> &T {
        &self.td
    }

    pub fn md(&self) -> &MdSession<M> {
        &self.md
    }

    pub fn directory(&self) -> &SharedDirectory {
        &self.directory
    }

    pub fn gateway_name(&self) -> &str {
        self.td.gateway_name()
    }

    /// Connect both sessions and start the periodic query rotation.
    pub fn connect(&mut self, settings: &ConnectSettings) {
        let td_address = normalize_address(&settings.trade_address);
        let md_address = normalize_address(&settings.md_address);
        tracing::info!(
            gateway = %self.gateway_name(),
            td = %td_address,
            md = %md_address,
            "connecting"
        );

        self.td.connect(&td_address, settings);
        self.md.connect(&md_address, settings);

        self.ticks = 0;
        self.next_query = 0;
        self.query_armed = true;
    }

    pub fn subscribe(&mut self, req: &SubscribeRequest) {
        self.md.subscribe(req);
    }

    pub fn send_order(&mut self, req: &OrderRequest) -> Result<String, ValidationError> {
        self.td.send_order(req)
    }

    pub fn cancel_order(&mut self, req: &CancelRequest) -> Result<(), ValidationError> {
        self.td.cancel_order(req)
    }

    pub fn query_account(&mut self) {
        self.td.query_account();
    }

    pub fn query_position(&mut self) {
        self.td.query_position();
    }

    pub fn send_exercise(&mut self, req: &ExerciseRequest) {
        self.td.send_exercise(req);
    }

    pub fn cancel_exercise(&mut self, req: &CancelRequest) {
        self.td.cancel_exercise(req);
    }

    pub fn query_exercise(&mut self) {
        self.td.query_exercise();
    }

    pub fn close(&mut self) {
        self.query_armed = false;
        self.td.close();
        self.md.close();
    }

    pub fn handle_td(&mut self, callback: T::Callback) {
        self.td.handle(callback);
    }

    pub fn handle_md(&mut self, callback: MdCallback) {
        self.md.handle(callback);
    }

    /// Host timer tick. Every `query_every` ticks the next query in the
    /// account/position rotation is issued and the market-data date is
    /// refreshed; the trading session sees every tick.
    pub fn on_timer(&mut self) {
        if self.query_armed {
            self.ticks += 1;
            if self.ticks >= self.query_every {
                self.ticks = 0;
                match ROTATION[self.next_query % ROTATION.len()] {
                    PeriodicQuery::Account => self.td.query_account(),
                    PeriodicQuery::Position => self.td.query_position(),
                }
                self.next_query = (self.next_query + 1) % ROTATION.len();
                self.md.update_date(time::china_today());
            }
        }
        self.td.on_timer();
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

pub fn futures_gateway<T, M>(
    td_api: T,
    md_api: M,
    sink: Arc<dyn EventSink>,
    gateway_name: &str,
    retry: RetryPolicy,
) -> FuturesGateway<T, M>
where
    T: NativeApi<FuturesRequest>,
    M: NativeApi<MdRequest>,
{
    let directory = ContractDirectory::shared();
    let td = FuturesSession::new(td_api, Arc::clone(&directory), Arc::clone(&sink), gateway_name)
        .with_retry_policy(retry);
    let md = MdSession::new(md_api, Arc::clone(&directory), sink, gateway_name);
    Gateway::new(td, md, directory)
}

/// The client-order-id counter is seeded from the current exchange-local time.
pub fn options_gateway<T, M>(
    td_api: T,
    md_api: M,
    sink: Arc<dyn EventSink>,
    gateway_name: &str,
    countdown_ticks: u32,
) -> OptionsGateway<T, M>
where
    T: NativeApi<OptionsRequest>,
    M: NativeApi<MdRequest>,
{
    let directory = ContractDirectory::shared();
    let seed = seed_order_ref(time::china_now_time());
    let td = OptionsSession::new(
        td_api,
        Arc::clone(&directory),
        Arc::clone(&sink),
        gateway_name,
        seed,
    )
    .with_countdown_ticks(countdown_ticks);
    let md = MdSession::new(md_api, Arc::clone(&directory), sink, gateway_name);
    Gateway::new(td, md, directory)
}

// ---------------------------------------------------------------------------
// Timer task
// ---------------------------------------------------------------------------

/// Spawn the periodic host timer.
///
/// The gateway lock can be held for seconds by a callback sleeping in the
/// contract-query backoff, so each tick locks and runs `on_timer` on the
/// blocking pool. Ticks missed meanwhile are skipped, not queued.
pub fn spawn_timer<T, M>(gateway: Arc<Mutex<Gateway<T, M>>>, interval: Duration) -> JoinHandle<()>
where
    T: TradingSession + Send + 'static,
    M: NativeApi<MdRequest> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let gw = Arc::clone(&gateway);
            let tick = tokio::task::spawn_blocking(move || {
                let mut gw = gw.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                gw.on_timer();
            });
            if let Err(e) = tick.await {
                tracing::error!("gateway timer tick failed: {e}");
            }
        }
    })
}
