//! Scenario: every supported enum survives a trip to its protocol code and
//! back.
//!
//! GREEN when:
//! - directions, offsets and order types round-trip on both APIs
//! - FAK and FOK map to distinct stock-option codes and both come back
//! - values an API cannot express are refused

use tgw_protocol::mapping::{
    direction_from_futures, direction_from_stock, direction_to_futures, direction_to_stock,
    offset_from_futures, offset_from_stock, offset_to_futures, offset_to_stock,
    order_type_from_futures, order_type_from_stock, order_type_to_futures, order_type_to_stock,
};
use tgw_schemas::{Direction, Offset, OrderType};

const DIRECTIONS: [Direction; 2] = [Direction::Long, Direction::Short];
const ORDER_TYPES: [OrderType; 4] = [
    OrderType::Limit,
    OrderType::Market,
    OrderType::Fak,
    OrderType::Fok,
];

#[test]
fn futures_tables_round_trip() {
    for d in DIRECTIONS {
        assert_eq!(direction_from_futures(direction_to_futures(d)), Some(d));
    }
    for o in [
        Offset::Open,
        Offset::Close,
        Offset::CloseToday,
        Offset::CloseYesterday,
    ] {
        let code = offset_to_futures(o).unwrap();
        assert_eq!(offset_from_futures(code), Some(o));
    }
    for t in ORDER_TYPES {
        let kind = order_type_to_futures(t).unwrap();
        assert_eq!(order_type_from_futures(kind), Some(t));
    }
    assert_eq!(offset_to_futures(Offset::None), None);
}

#[test]
fn stock_tables_round_trip() {
    for d in DIRECTIONS {
        assert_eq!(direction_from_stock(direction_to_stock(d)), Some(d));
    }
    for o in [Offset::Open, Offset::Close] {
        let code = offset_to_stock(o).unwrap();
        assert_eq!(offset_from_stock(code), Some(o));
    }
    for t in ORDER_TYPES {
        let (ord_type, tif) = order_type_to_stock(t).unwrap();
        assert_eq!(order_type_from_stock(ord_type, tif), Some(t));
    }
    for o in [Offset::None, Offset::CloseToday, Offset::CloseYesterday] {
        assert_eq!(offset_to_stock(o), None);
    }
}

#[test]
fn stock_fak_and_fok_are_distinct() {
    let fak = order_type_to_stock(OrderType::Fak).unwrap();
    let fok = order_type_to_stock(OrderType::Fok).unwrap();
    assert_ne!(fak, fok);
    assert_eq!(fak.0, fok.0);
}
