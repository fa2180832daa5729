//! tgw-schemas
//!
//! Normalized trading-platform object model shared by every session:
//! ticks, orders, trades, positions, accounts, contracts, plus the
//! host-inbound request types and the outbound [`GatewayEvent`] union.
//!
//! Pure data. No IO, no protocol codes (those live in `tgw-protocol`).

mod event;
mod model;
mod request;

pub use event::{GatewayEvent, LogEntry};
pub use model::{
    AccountData, ContractData, ExerciseData, OptionDetails, OrderData, PositionData, TickData,
    TradeData, BOOK_DEPTH,
};
pub use request::{CancelRequest, ConnectSettings, ExerciseRequest, OrderRequest, SubscribeRequest};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// Venues reachable through the broker gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Exchange {
    /// China Financial Futures Exchange.
    CFFEX,
    /// Shanghai Futures Exchange.
    SHFE,
    /// Zhengzhou Commodity Exchange.
    CZCE,
    /// Dalian Commodity Exchange.
    DCE,
    /// Shanghai International Energy Exchange.
    INE,
    /// Shanghai Stock Exchange.
    SSE,
    /// Shenzhen Stock Exchange.
    SZSE,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::CFFEX => "CFFEX",
            Exchange::SHFE => "SHFE",
            Exchange::CZCE => "CZCE",
            Exchange::DCE => "DCE",
            Exchange::INE => "INE",
            Exchange::SSE => "SSE",
            Exchange::SZSE => "SZSE",
        }
    }

    /// Stock venues use a different market-data key layout and order API.
    pub fn is_stock_venue(&self) -> bool {
        matches!(self, Exchange::SSE | Exchange::SZSE)
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a venue code is not one the gateway knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownExchange(pub String);

impl fmt::Display for UnknownExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown exchange code '{}'", self.0)
    }
}

impl std::error::Error for UnknownExchange {}

impl FromStr for Exchange {
    type Err = UnknownExchange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CFFEX" => Ok(Exchange::CFFEX),
            "SHFE" => Ok(Exchange::SHFE),
            "CZCE" => Ok(Exchange::CZCE),
            "DCE" => Ok(Exchange::DCE),
            "INE" => Ok(Exchange::INE),
            "SSE" => Ok(Exchange::SSE),
            "SZSE" => Ok(Exchange::SZSE),
            other => Err(UnknownExchange(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Order attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// Open/close flag. `None` is what a host sends when it did not pick one;
/// no session accepts it for order entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Offset {
    #[default]
    None,
    Open,
    Close,
    CloseToday,
    CloseYesterday,
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Offset::None => "NONE",
            Offset::Open => "OPEN",
            Offset::Close => "CLOSE",
            Offset::CloseToday => "CLOSETODAY",
            Offset::CloseYesterday => "CLOSEYESTERDAY",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    Limit,
    Market,
    /// Fill-and-kill: limit price, immediate-or-cancel.
    Fak,
    /// Fill-or-kill: limit price, whole quantity or nothing.
    Fok,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::Limit => "LIMIT",
            OrderType::Market => "MARKET",
            OrderType::Fak => "FAK",
            OrderType::Fok => "FOK",
        };
        f.write_str(s)
    }
}

/// Order lifecycle status as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Submitting,
    NotTraded,
    PartTraded,
    AllTraded,
    Cancelled,
    Rejected,
}

impl Status {
    /// Returns `true` once no further updates are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::AllTraded | Status::Cancelled | Status::Rejected)
    }
}

// ---------------------------------------------------------------------------
// Contract attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    Futures,
    Option,
    Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}
