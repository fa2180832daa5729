//! Scenario: a paginated position query merges to the same result in any
//! page order.
//!
//! GREEN when:
//! - every permutation of the same page set yields identical volume,
//!   yesterday volume, frozen and average price
//! - the same holds end-to-end through the futures session

use tgw_protocol::futures::InvestorPositionField;
use tgw_schemas::{Direction, Exchange, PositionData};
use tgw_session::futures::PositionAccumulator;
use tgw_testkit::fixtures::{
    drive_futures_to_loaded, futures_contract, futures_harness, futures_instrument,
    position_page, position_record,
};

const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

fn pages(symbol: &str) -> Vec<InvestorPositionField> {
    // Yesterday's holding and today's holding arrive as separate records.
    let mut yd = position_record(symbol, Direction::Long, 3, 0, 105_000.0);
    yd.short_frozen = 1;
    let today = position_record(symbol, Direction::Long, 2, 2, 70_400.0);
    let short = position_record(symbol, Direction::Short, 1, 1, 35_100.0);
    vec![yd, today, short]
}

fn merged(exchange: Exchange, order: [usize; 3]) -> Vec<PositionData> {
    let contract = futures_contract("rb2410", exchange, 10.0);
    let recs = pages("rb2410");
    let mut acc = PositionAccumulator::new("NHFUTURES");
    for i in order {
        assert!(acc.merge(&recs[i], &contract));
    }
    acc.drain()
}

#[test]
fn accumulator_is_order_independent() {
    for exchange in [Exchange::SHFE, Exchange::DCE] {
        let reference = merged(exchange, PERMUTATIONS[0]);
        for order in PERMUTATIONS {
            assert_eq!(merged(exchange, order), reference, "{exchange} {order:?}");
        }
    }
}

#[test]
fn accumulator_values() {
    let shfe = merged(Exchange::SHFE, [2, 1, 0]);
    let long = shfe.iter().find(|p| p.direction == Direction::Long).unwrap();
    assert_eq!(long.volume, 5);
    assert_eq!(long.yd_volume, 3);
    assert_eq!(long.frozen, 1);
    assert_eq!(long.price, (105_000.0 + 70_400.0) / 50.0);

    let short = shfe.iter().find(|p| p.direction == Direction::Short).unwrap();
    assert_eq!(short.volume, 1);
    assert_eq!(short.yd_volume, 0);
    assert_eq!(short.price, 3510.0);
}

#[test]
fn session_publishes_same_positions_for_any_page_order() {
    let mut results = Vec::new();
    for order in [[0, 1, 2], [2, 1, 0]] {
        let mut h = futures_harness("NHFUTURES");
        drive_futures_to_loaded(
            &mut h.session,
            &[futures_instrument("rb2410", Exchange::SHFE, 10.0)],
        );
        let recs = pages("rb2410");
        for (n, i) in order.iter().enumerate() {
            h.session
                .handle(position_page(recs[*i].clone(), n + 1 == order.len()));
        }
        results.push(h.sink.positions());
    }
    assert_eq!(results[0].len(), 2);
    assert_eq!(results[0], results[1]);
}
