//! Bidirectional mapping tables between protocol codes and normalized enums.
//!
//! Outbound (`*_to_*`) functions return `None` for values the API cannot
//! express; sessions turn that into a local [`crate::ValidationError`].
//! Inbound (`*_from_*`) functions return `None` for codes we do not map;
//! callers decide whether that skips the record or falls back.

use tgw_schemas::{Direction, Exchange, Offset, OptionType, OrderType, Product, Status, SubscribeRequest};

use crate::codes::{futures as f, stock as s};

// ---------------------------------------------------------------------------
// Futures
// ---------------------------------------------------------------------------

/// The three native fields that together encode an order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuturesOrderKind {
    pub price_type: char,
    pub time_condition: char,
    pub volume_condition: char,
}

impl FuturesOrderKind {
    const fn new(price_type: char, time_condition: char, volume_condition: char) -> Self {
        Self {
            price_type,
            time_condition,
            volume_condition,
        }
    }
}

const FUTURES_ORDER_KINDS: [(OrderType, FuturesOrderKind); 4] = [
    (OrderType::Limit, FuturesOrderKind::new(f::OPT_LIMIT_PRICE, f::TC_GFD, f::VC_AV)),
    (OrderType::Market, FuturesOrderKind::new(f::OPT_ANY_PRICE, f::TC_GFD, f::VC_AV)),
    (OrderType::Fak, FuturesOrderKind::new(f::OPT_LIMIT_PRICE, f::TC_IOC, f::VC_AV)),
    (OrderType::Fok, FuturesOrderKind::new(f::OPT_LIMIT_PRICE, f::TC_IOC, f::VC_CV)),
];

pub fn order_type_to_futures(order_type: OrderType) -> Option<FuturesOrderKind> {
    FUTURES_ORDER_KINDS
        .iter()
        .find(|(t, _)| *t == order_type)
        .map(|(_, k)| *k)
}

pub fn order_type_from_futures(kind: FuturesOrderKind) -> Option<OrderType> {
    FUTURES_ORDER_KINDS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(t, _)| *t)
}

pub fn direction_to_futures(direction: Direction) -> char {
    match direction {
        Direction::Long => f::D_BUY,
        Direction::Short => f::D_SELL,
    }
}

/// Accepts both order directions and position directions.
pub fn direction_from_futures(code: char) -> Option<Direction> {
    match code {
        f::D_BUY | f::PD_LONG => Some(Direction::Long),
        f::D_SELL | f::PD_SHORT => Some(Direction::Short),
        _ => None,
    }
}

pub fn offset_to_futures(offset: Offset) -> Option<char> {
    match offset {
        Offset::Open => Some(f::OF_OPEN),
        Offset::Close => Some(f::OF_CLOSE),
        Offset::CloseToday => Some(f::OF_CLOSE_TODAY),
        Offset::CloseYesterday => Some(f::OF_CLOSE_YESTERDAY),
        Offset::None => None,
    }
}

pub fn offset_from_futures(code: char) -> Option<Offset> {
    match code {
        f::OF_OPEN => Some(Offset::Open),
        f::OF_CLOSE => Some(Offset::Close),
        f::OF_CLOSE_TODAY => Some(Offset::CloseToday),
        f::OF_CLOSE_YESTERDAY => Some(Offset::CloseYesterday),
        _ => None,
    }
}

/// Submit-status and order-status codes share one table.
pub fn status_from_futures(code: char) -> Option<Status> {
    match code {
        f::OAS_SUBMITTED | f::OAS_ACCEPTED => Some(Status::Submitting),
        f::OAS_REJECTED => Some(Status::Rejected),
        f::OST_NO_TRADE_QUEUEING => Some(Status::NotTraded),
        f::OST_PART_TRADED_QUEUEING => Some(Status::PartTraded),
        f::OST_ALL_TRADED => Some(Status::AllTraded),
        f::OST_CANCELED => Some(Status::Cancelled),
        _ => None,
    }
}

pub fn product_from_futures(code: char) -> Option<Product> {
    match code {
        f::PC_FUTURES => Some(Product::Futures),
        f::PC_OPTIONS | f::PC_SPOT_OPTION => Some(Product::Option),
        f::PC_COMBINATION => Some(Product::Spread),
        _ => None,
    }
}

pub fn option_type_from_futures(code: char) -> Option<OptionType> {
    match code {
        f::CP_CALL => Some(OptionType::Call),
        f::CP_PUT => Some(OptionType::Put),
        _ => None,
    }
}

/// Venues served by the futures trading API.
pub fn exchange_from_futures(code: &str) -> Option<Exchange> {
    match code {
        "CFFEX" => Some(Exchange::CFFEX),
        "SHFE" => Some(Exchange::SHFE),
        "CZCE" => Some(Exchange::CZCE),
        "DCE" => Some(Exchange::DCE),
        "INE" => Some(Exchange::INE),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Stock options
// ---------------------------------------------------------------------------

/// `(OrdType, TimeInForce)` pairs. FAK and FOK are distinct entries.
const STOCK_ORDER_KINDS: [(OrderType, (char, char)); 4] = [
    (OrderType::Market, (s::ORD_TYPE_MARKET, s::TIF_GFD)),
    (OrderType::Limit, (s::ORD_TYPE_LIMIT, s::TIF_GFD)),
    (OrderType::Fak, (s::ORD_TYPE_LIMIT, s::TIF_IOC)),
    (OrderType::Fok, (s::ORD_TYPE_LIMIT, s::TIF_FOK)),
];

pub fn order_type_to_stock(order_type: OrderType) -> Option<(char, char)> {
    STOCK_ORDER_KINDS
        .iter()
        .find(|(t, _)| *t == order_type)
        .map(|(_, k)| *k)
}

pub fn order_type_from_stock(ord_type: char, time_in_force: char) -> Option<OrderType> {
    STOCK_ORDER_KINDS
        .iter()
        .find(|(_, k)| *k == (ord_type, time_in_force))
        .map(|(t, _)| *t)
}

pub fn direction_to_stock(direction: Direction) -> char {
    match direction {
        Direction::Long => s::SIDE_BUY,
        Direction::Short => s::SIDE_SELL,
    }
}

pub fn direction_from_stock(code: char) -> Option<Direction> {
    match code {
        s::SIDE_BUY => Some(Direction::Long),
        s::SIDE_SELL => Some(Direction::Short),
        _ => None,
    }
}

pub fn offset_to_stock(offset: Offset) -> Option<char> {
    match offset {
        Offset::Open => Some(s::OC_OPEN),
        Offset::Close => Some(s::OC_CLOSE),
        _ => None,
    }
}

pub fn offset_from_stock(code: char) -> Option<Offset> {
    match code {
        s::OC_OPEN => Some(Offset::Open),
        s::OC_CLOSE => Some(Offset::Close),
        _ => None,
    }
}

pub fn status_from_stock(code: char) -> Option<Status> {
    match code {
        s::STATUS_SUCCESS => Some(Status::NotTraded),
        s::STATUS_TRADE => Some(Status::PartTraded),
        s::STATUS_ALL => Some(Status::AllTraded),
        s::STATUS_CANCEL => Some(Status::Cancelled),
        s::STATUS_REJECT => Some(Status::Rejected),
        _ => None,
    }
}

pub fn option_type_from_stock(code: char) -> Option<OptionType> {
    match code {
        s::CALL_OR_PUT_E => Some(OptionType::Call),
        s::CALL_OR_PUT_A => Some(OptionType::Put),
        _ => None,
    }
}

/// Stock-option venue from the contract id's leading digit.
pub fn stock_option_exchange(contract_id: &str) -> Exchange {
    if contract_id.starts_with('9') {
        Exchange::SZSE
    } else {
        Exchange::SSE
    }
}

// ---------------------------------------------------------------------------
// Market data
// ---------------------------------------------------------------------------

/// Instrument-class code for stock options on the market-data feed.
pub const MD_CLASS_STOCK_OPTION: &str = "M0301";

/// Venue-qualified market-data key: `{EX}.M0301.{symbol}` on stock venues,
/// `{EX}.{symbol}` elsewhere.
pub fn md_subscribe_key(req: &SubscribeRequest) -> String {
    if req.exchange.is_stock_venue() {
        format!("{}.{}.{}", req.exchange, MD_CLASS_STOCK_OPTION, req.symbol)
    } else {
        format!("{}.{}", req.exchange, req.symbol)
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Renders a price the way the broker's reference tooling prints floats:
/// always with a fractional part (`3000.0`, `2.95`).
pub fn price_repr(value: f64) -> String {
    format!("{value:?}")
}
