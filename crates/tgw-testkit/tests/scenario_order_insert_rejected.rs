//! Scenario: a broker-refused order insert leaves the host with a terminal
//! order, never a dangling `Submitting` one.
//!
//! GREEN when:
//! - `send_order` publishes an optimistic `Submitting` order and returns its vt id
//! - the insert error publishes a `Rejected` order under the same id
//! - the error text reaches the host log
//! - locally invalid requests are refused before anything is sent

use tgw_protocol::futures::{FuturesCallback, FuturesRequest};
use tgw_protocol::options::{OptionsCallback, OptionsRequest};
use tgw_protocol::{RspInfo, RspMeta, ValidationError};
use tgw_schemas::{Direction, Exchange, Offset, Status};
use tgw_testkit::fixtures::{
    drive_futures_to_loaded, drive_options_to_loaded, futures_harness, futures_instrument,
    limit_order, option_instrument, options_harness,
};

#[test]
fn futures_insert_error_synthesizes_rejection() {
    let mut h = futures_harness("NHFUTURES");
    drive_futures_to_loaded(
        &mut h.session,
        &[futures_instrument("rb2410", Exchange::SHFE, 10.0)],
    );

    let vt = h
        .session
        .send_order(&limit_order("rb2410", Exchange::SHFE, Direction::Long, Offset::Open))
        .unwrap();
    assert_eq!(vt, "NHFUTURES.1_7_1");

    let echoed = h
        .api
        .requests()
        .into_iter()
        .find_map(|r| match r {
            FuturesRequest::OrderInsert(f) => Some(f),
            _ => None,
        })
        .unwrap();
    h.session.handle(FuturesCallback::RspOrderInsert {
        data: echoed,
        info: RspInfo::error(31, "insufficient margin"),
        meta: RspMeta::default(),
    });

    let orders = h.sink.orders();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].status, Status::Submitting);
    assert_eq!(orders[1].status, Status::Rejected);
    assert_eq!(orders[1].vt_orderid(), vt);
    assert!(h
        .sink
        .logs()
        .contains(&"order insert failed, code: 31, message: insufficient margin".to_string()));
}

#[test]
fn futures_offset_must_be_chosen() {
    let mut h = futures_harness("NHFUTURES");
    let before = h.api.request_count();
    let err = h
        .session
        .send_order(&limit_order("rb2410", Exchange::SHFE, Direction::Long, Offset::None))
        .unwrap_err();
    assert_eq!(err, ValidationError::UnsupportedOffset(Offset::None));
    assert_eq!(h.api.request_count(), before);
    assert!(h.sink.orders().is_empty());
}

#[test]
fn option_insert_error_rejects_tracked_order() {
    let mut h = options_harness("NHSTOCK", 930_150_000);
    drive_options_to_loaded(
        &mut h.session,
        &[option_instrument("10004567", "50ETF购6M2900", 2.9)],
    );

    let vt = h
        .session
        .send_order(&limit_order("10004567", Exchange::SSE, Direction::Long, Offset::Open))
        .unwrap();
    assert_eq!(vt, "NHSTOCK.930150001");

    let echoed = h
        .api
        .requests()
        .into_iter()
        .find_map(|r| match r {
            OptionsRequest::OptionsInsert(f) => Some(f),
            _ => None,
        })
        .unwrap();
    h.session.handle(OptionsCallback::RspOptionsInsert {
        data: echoed,
        info: RspInfo::error(8, "price out of range"),
        meta: RspMeta::default(),
    });

    let orders = h.sink.orders();
    assert_eq!(orders.last().unwrap().status, Status::Rejected);
    assert_eq!(orders.last().unwrap().orderid, "930150001");

    let err = h
        .session
        .send_order(&limit_order("10004567", Exchange::SSE, Direction::Short, Offset::CloseToday))
        .unwrap_err();
    assert_eq!(err, ValidationError::UnsupportedOffset(Offset::CloseToday));
}
