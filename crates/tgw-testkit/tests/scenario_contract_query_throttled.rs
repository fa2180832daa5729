//! Scenario: the rate-limited contract query is retried with a bounded
//! budget.
//!
//! GREEN when:
//! - refused attempts are retried and the query is sent once accepted
//! - request ids keep increasing across refused attempts
//! - an exhausted budget is reported, leaves the session waiting for
//!   contracts and keeps buffering private-stream pushes

use tgw_protocol::futures::{FuturesCallback, FuturesRequest};
use tgw_protocol::{RspInfo, RspMeta};
use tgw_schemas::Exchange;
use tgw_session::FuturesState;
use tgw_testkit::fixtures::{futures_harness, futures_login_ok, futures_order};

fn confirm() -> FuturesCallback {
    FuturesCallback::RspSettlementInfoConfirm {
        info: RspInfo::ok(),
        meta: RspMeta::default(),
    }
}

#[test]
fn throttled_query_is_retried_until_accepted() {
    let mut h = futures_harness("NHFUTURES");
    h.session.handle(FuturesCallback::FrontConnected);
    h.session.handle(futures_login_ok(1, 7));

    h.api.throttle_next(2);
    h.session.handle(confirm());

    let sent = h.api.requests_with_ids();
    let qry: Vec<_> = sent
        .iter()
        .filter(|(r, _)| matches!(r, FuturesRequest::QryInstrument))
        .collect();
    assert_eq!(qry.len(), 1);
    // login=1, confirm=2, refused=3,4, accepted=5
    assert_eq!(qry[0].1, 5);
    assert!(sent.windows(2).all(|w| w[0].1 < w[1].1));
    assert_eq!(h.session.state(), FuturesState::SettlementConfirmed);
}

#[test]
fn exhausted_budget_is_logged_and_pushes_stay_buffered() {
    let mut h = futures_harness("NHFUTURES");
    h.session.handle(FuturesCallback::FrontConnected);
    h.session.handle(futures_login_ok(1, 7));

    h.api.throttle_next(50);
    h.session.handle(confirm());

    assert!(!h
        .api
        .requests()
        .iter()
        .any(|r| matches!(r, FuturesRequest::QryInstrument)));
    assert!(h
        .sink
        .logs()
        .contains(&"contract query abandoned after 5 attempts".to_string()));
    assert_eq!(h.session.state(), FuturesState::SettlementConfirmed);
    assert!(!h.session.contracts_loaded());

    h.session.handle(FuturesCallback::RtnOrder {
        data: futures_order("rb2410", Exchange::SHFE, 1, 7, "1", "S1"),
    });
    assert!(h.sink.orders().is_empty());
}
