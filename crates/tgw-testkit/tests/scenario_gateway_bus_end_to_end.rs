//! Scenario: a stock-option gateway driven by its timer publishes onto the
//! broadcast bus.
//!
//! GREEN when:
//! - the countdown timer issues the contract query without host action
//! - bus subscribers see contracts and orders in publish order
//! - the periodic rotation alternates account and position queries

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tgw_gateway::{options_gateway, spawn_timer, EventBus};
use tgw_protocol::md::MdRequest;
use tgw_protocol::options::{OptionsCallback, OptionsRequest};
use tgw_schemas::{ConnectSettings, Direction, Exchange, GatewayEvent, Offset};
use tgw_testkit::fixtures::{
    limit_order, option_instrument, option_instrument_page, options_login_ok,
};
use tgw_testkit::ScriptedApi;

fn settings() -> ConnectSettings {
    ConnectSettings {
        user_id: "1001".into(),
        password: "pw".into(),
        party_id: "P01".into(),
        trade_address: "10.1.1.1:6001".into(),
        md_address: "10.1.1.1:6002".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn timer_drives_contract_query_and_bus_delivers() {
    let td = ScriptedApi::<OptionsRequest>::new();
    let md = ScriptedApi::<MdRequest>::new();
    let bus = Arc::new(EventBus::new(64));
    let mut rx = bus.subscribe();

    let mut gw = options_gateway(td.clone(), md, bus.clone(), "NHSTOCK", 2);
    gw.connect(&settings());
    gw.handle_td(OptionsCallback::FrontConnected);
    gw.handle_td(options_login_ok(0));
    td.clear();

    let gw = Arc::new(Mutex::new(gw));
    let timer = spawn_timer(Arc::clone(&gw), Duration::from_millis(5));
    let mut waited = 0;
    while !td
        .requests()
        .iter()
        .any(|r| matches!(r, OptionsRequest::QryOptions))
    {
        assert!(waited < 400, "contract query never issued");
        tokio::time::sleep(Duration::from_millis(5)).await;
        waited += 1;
    }
    timer.abort();

    let mut gw = gw.lock().unwrap();
    gw.handle_td(option_instrument_page(
        option_instrument("10004567", "50ETF购6M2900", 2.9),
        true,
    ));
    gw.send_order(&limit_order("10004567", Exchange::SSE, Direction::Long, Offset::Open))
        .unwrap();

    let mut topics = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        if !matches!(ev, GatewayEvent::Log(_)) {
            topics.push(ev.topic());
        }
    }
    assert_eq!(topics, vec!["contract", "order"]);
}

#[test]
fn rotation_alternates_queries() {
    let td = ScriptedApi::<OptionsRequest>::new();
    let md = ScriptedApi::<MdRequest>::new();
    let mut gw = options_gateway(td.clone(), md, Arc::new(EventBus::default()), "NHSTOCK", 100)
        .with_query_every(2);
    gw.connect(&settings());

    for _ in 0..8 {
        gw.on_timer();
    }
    let kinds: Vec<&str> = td
        .requests()
        .iter()
        .map(|r| match r {
            OptionsRequest::QryPartAccount(_) => "account",
            OptionsRequest::QryPosition(_) => "position",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["account", "position", "account", "position"]);
}
