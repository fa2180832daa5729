//! tgw-gateway
//!
//! Host-facing facade over one trading session and one market-data session:
//!
//! - address normalization and credential fan-out on `connect`
//! - the periodic host timer: account/position query round-robin, the
//!   stock-option contract countdown, the market-data date refresh
//! - a `tokio::sync::broadcast` event bus implementing
//!   [`tgw_session::EventSink`]

mod bus;
mod gateway;
mod trading;

pub use bus::{EventBus, DEFAULT_BUS_CAPACITY};
pub use gateway::{
    futures_gateway, normalize_address, options_gateway, spawn_timer, FuturesGateway, Gateway,
    OptionsGateway, DEFAULT_QUERY_EVERY, FUTURES_GATEWAY_NAME, OPTIONS_GATEWAY_NAME,
};
pub use trading::TradingSession;
