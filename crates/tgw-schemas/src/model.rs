use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Direction, Exchange, Offset, OptionType, OrderType, Product, Status};

/// Number of book levels carried on a tick.
pub const BOOK_DEPTH: usize = 5;

fn vt_symbol(symbol: &str, exchange: Exchange) -> String {
    format!("{symbol}.{exchange}")
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Option-specific attributes of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDetails {
    /// Option group identifier (product family the option belongs to).
    pub portfolio: String,
    pub underlying: String,
    /// `None` when the broker reported an option type code we do not map.
    pub option_type: Option<OptionType>,
    pub strike: f64,
    pub expiry: Option<NaiveDate>,
    /// Normalized chain index (strike plus optional venue month code).
    pub index: String,
}

/// Reference data for one tradable instrument. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractData {
    pub symbol: String,
    pub exchange: Exchange,
    pub name: String,
    pub product: Product,
    /// Contract multiplier.
    pub size: f64,
    pub pricetick: f64,
    pub option: Option<OptionDetails>,
    pub gateway_name: String,
}

impl ContractData {
    pub fn vt_symbol(&self) -> String {
        vt_symbol(&self.symbol, self.exchange)
    }
}

// ---------------------------------------------------------------------------
// Tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickData {
    pub symbol: String,
    pub exchange: Exchange,
    pub datetime: DateTime<FixedOffset>,
    pub name: String,
    pub volume: i64,
    pub open_interest: f64,
    pub last_price: f64,
    pub limit_up: f64,
    pub limit_down: f64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub pre_close: f64,
    /// Index 0 is the best level.
    pub bid_price: [f64; BOOK_DEPTH],
    pub ask_price: [f64; BOOK_DEPTH],
    pub bid_volume: [i64; BOOK_DEPTH],
    pub ask_volume: [i64; BOOK_DEPTH],
    pub gateway_name: String,
}

impl TickData {
    pub fn vt_symbol(&self) -> String {
        vt_symbol(&self.symbol, self.exchange)
    }
}

// ---------------------------------------------------------------------------
// Order / Trade
// ---------------------------------------------------------------------------

/// Snapshot of an order as last reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderData {
    pub symbol: String,
    pub exchange: Exchange,
    pub orderid: String,
    pub order_type: OrderType,
    pub direction: Direction,
    pub offset: Offset,
    pub price: f64,
    pub volume: i64,
    pub traded: i64,
    pub status: Status,
    /// Exchange insert time. `None` for locally synthesized snapshots.
    pub datetime: Option<DateTime<FixedOffset>>,
    pub reference: String,
    pub gateway_name: String,
}

impl OrderData {
    pub fn vt_symbol(&self) -> String {
        vt_symbol(&self.symbol, self.exchange)
    }

    pub fn vt_orderid(&self) -> String {
        format!("{}.{}", self.gateway_name, self.orderid)
    }

    /// `true` while the order can still trade or be cancelled.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            Status::Submitting | Status::NotTraded | Status::PartTraded
        )
    }
}

/// A single execution. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeData {
    pub symbol: String,
    pub exchange: Exchange,
    /// Reconciled local order id of the parent order.
    pub orderid: String,
    pub tradeid: String,
    pub direction: Direction,
    pub offset: Offset,
    pub price: f64,
    pub volume: i64,
    pub datetime: Option<DateTime<FixedOffset>>,
    pub gateway_name: String,
}

impl TradeData {
    pub fn vt_orderid(&self) -> String {
        format!("{}.{}", self.gateway_name, self.orderid)
    }

    pub fn vt_tradeid(&self) -> String {
        format!("{}.{}", self.gateway_name, self.tradeid)
    }
}

// ---------------------------------------------------------------------------
// Position / Account
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    pub symbol: String,
    pub exchange: Exchange,
    pub direction: Direction,
    pub volume: i64,
    pub yd_volume: i64,
    pub frozen: i64,
    /// Weighted-average cost price.
    pub price: f64,
    pub pnl: f64,
    pub gateway_name: String,
}

impl PositionData {
    pub fn new(
        symbol: impl Into<String>,
        exchange: Exchange,
        direction: Direction,
        gateway_name: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange,
            direction,
            volume: 0,
            yd_volume: 0,
            frozen: 0,
            price: 0.0,
            pnl: 0.0,
            gateway_name: gateway_name.into(),
        }
    }

    pub fn vt_positionid(&self) -> String {
        format!(
            "{}.{}.{}",
            self.gateway_name,
            vt_symbol(&self.symbol, self.exchange),
            self.direction
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountData {
    pub accountid: String,
    pub balance: f64,
    pub frozen: f64,
    pub available: f64,
    pub gateway_name: String,
}

// ---------------------------------------------------------------------------
// Exercise
// ---------------------------------------------------------------------------

/// Exercise notification. Travels on its own event channel, never as an
/// order or trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseData {
    pub orderid: String,
    pub volume: i64,
    /// `false` once the exercise has been withdrawn.
    pub active: bool,
    pub leg1_symbol: String,
    pub leg2_symbol: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: Status) -> OrderData {
        OrderData {
            symbol: "rb2410".to_string(),
            exchange: Exchange::SHFE,
            orderid: "1_2_3".to_string(),
            order_type: OrderType::Limit,
            direction: Direction::Long,
            offset: Offset::Open,
            price: 3500.0,
            volume: 2,
            traded: 0,
            status,
            datetime: None,
            reference: String::new(),
            gateway_name: "FUT".to_string(),
        }
    }

    #[test]
    fn order_ids_are_prefixed_with_gateway() {
        let o = order(Status::NotTraded);
        assert_eq!(o.vt_orderid(), "FUT.1_2_3");
        assert_eq!(o.vt_symbol(), "rb2410.SHFE");
    }

    #[test]
    fn active_only_while_working() {
        assert!(order(Status::Submitting).is_active());
        assert!(order(Status::PartTraded).is_active());
        assert!(!order(Status::Cancelled).is_active());
        assert!(!order(Status::Rejected).is_active());
    }

    #[test]
    fn contract_serializes_with_option_details() {
        let c = ContractData {
            symbol: "10004567".to_string(),
            exchange: Exchange::SSE,
            name: "50ETF购6月2900".to_string(),
            product: Product::Option,
            size: 10000.0,
            pricetick: 0.0001,
            option: Some(OptionDetails {
                portfolio: "510050".to_string(),
                underlying: "510050_20240626".to_string(),
                option_type: Some(OptionType::Call),
                strike: 2.9,
                expiry: NaiveDate::from_ymd_opt(2024, 6, 26),
                index: "2.900-M".to_string(),
            }),
            gateway_name: "OPT".to_string(),
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: ContractData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
