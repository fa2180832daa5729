//! Scenario: subscriptions registered while disconnected are sent once the
//! market-data login succeeds, exactly once per key.
//!
//! GREEN when:
//! - nothing is sent before login
//! - after login one subscribe per distinct key is issued
//! - duplicate `subscribe` calls do not produce duplicate requests
//! - a later re-login replays the full set again, once

use std::sync::Arc;

use tgw_gateway::futures_gateway;
use tgw_protocol::futures::FuturesRequest;
use tgw_protocol::md::{MdCallback, MdRequest};
use tgw_schemas::{ConnectSettings, Exchange, SubscribeRequest};
use tgw_session::RetryPolicy;
use tgw_testkit::fixtures::md_login_ok;
use tgw_testkit::{RecordingSink, ScriptedApi};

fn subscribe_keys(reqs: Vec<MdRequest>) -> Vec<String> {
    reqs.into_iter()
        .filter_map(|r| match r {
            MdRequest::Subscribe { key } => Some(key),
            _ => None,
        })
        .collect()
}

#[test]
fn deferred_subscriptions_replay_once_per_key() {
    let td = ScriptedApi::<FuturesRequest>::new();
    let md = ScriptedApi::<MdRequest>::new();
    let sink = Arc::new(RecordingSink::new());
    let mut gw = futures_gateway(td, md.clone(), sink, "NHFUTURES", RetryPolicy::immediate(3));

    let rb = SubscribeRequest::new("rb2410", Exchange::SHFE);
    let opt = SubscribeRequest::new("10004567", Exchange::SSE);
    gw.subscribe(&rb);
    gw.subscribe(&rb);
    gw.subscribe(&opt);
    assert!(md.requests().is_empty());

    gw.connect(&ConnectSettings {
        md_address: "md.example:7001".into(),
        md_user: "mduser".into(),
        ..Default::default()
    });
    assert_eq!(md.opened(), vec!["tcp://md.example:7001".to_string()]);
    assert!(subscribe_keys(md.requests()).is_empty());

    gw.handle_md(MdCallback::FrontConnected);
    assert!(matches!(md.requests()[0], MdRequest::UtpLogin(ref f) if f.user_id == "mduser"));
    gw.handle_md(md_login_ok());

    assert_eq!(
        subscribe_keys(md.drain()),
        vec!["SHFE.rb2410".to_string(), "SSE.M0301.10004567".to_string()]
    );

    // Once ready, a new key goes out immediately and is remembered.
    gw.subscribe(&SubscribeRequest::new("sc2409", Exchange::INE));
    assert_eq!(subscribe_keys(md.drain()), vec!["INE.sc2409".to_string()]);

    // Reconnect: every key exactly once.
    gw.handle_md(MdCallback::FrontDisconnected);
    gw.handle_md(MdCallback::FrontConnected);
    gw.handle_md(md_login_ok());
    assert_eq!(
        subscribe_keys(md.drain()),
        vec![
            "INE.sc2409".to_string(),
            "SHFE.rb2410".to_string(),
            "SSE.M0301.10004567".to_string(),
        ]
    );
}
