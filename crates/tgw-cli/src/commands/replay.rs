//! Offline replay of a recorded callback stream.
//!
//! The session runs against a transport that records every request and
//! never refuses, so the output is a pure function of the input lines.
//! A `{"type":"timer"}` line stands for one host timer tick.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tgw_directory::{ContractDirectory, SharedDirectory};
use tgw_protocol::futures::{FuturesCallback, FuturesRequest};
use tgw_protocol::md::{MdCallback, MdRequest};
use tgw_protocol::options::{OptionsCallback, OptionsRequest};
use tgw_protocol::{NativeApi, RequestId, SendResult};
use tgw_schemas::{ConnectSettings, ContractData, GatewayEvent};
use tgw_session::{EventSink, FuturesSession, MdSession, OptionsSession, RetryPolicy};

use super::read_jsonl;
use crate::SessionKind;

const REPLAY_ADDRESS: &str = "tcp://replay";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Marker {
    Timer,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Line<C> {
    Marker(Marker),
    Callback(C),
}

// ---------------------------------------------------------------------------
// Recording transport + collecting sink
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct RecordingApi<R> {
    requests: Vec<(R, RequestId)>,
}

impl<R> Default for RecordingApi<R> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
        }
    }
}

impl<R> NativeApi<R> for RecordingApi<R> {
    fn open(&mut self, _address: &str) {}

    fn send(&mut self, request: R, request_id: RequestId) -> SendResult {
        self.requests.push((request, request_id));
        Ok(())
    }

    fn close(&mut self) {}
}

#[derive(Debug, Default)]
struct CollectSink {
    events: Mutex<Vec<GatewayEvent>>,
}

impl CollectSink {
    fn take(&self) -> Vec<GatewayEvent> {
        let mut events = self.events.lock().unwrap_or_else(|p| p.into_inner());
        std::mem::take(&mut *events)
    }
}

impl EventSink for CollectSink {
    fn publish(&self, event: GatewayEvent) {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

pub fn run(
    kind: SessionKind,
    input: &str,
    contracts: Option<&str>,
    gateway_name: &str,
) -> Result<()> {
    let directory = ContractDirectory::shared();
    if let Some(path) = contracts {
        preload(&directory, path)?;
    }
    let sink = Arc::new(CollectSink::default());
    let settings = replay_settings();

    let requests = match kind {
        SessionKind::Futures => {
            let lines: Vec<Line<FuturesCallback>> = load(input)?;
            let mut session = FuturesSession::new(
                RecordingApi::default(),
                Arc::clone(&directory),
                sink.clone(),
                gateway_name,
            )
            .with_retry_policy(RetryPolicy::immediate(1));
            session.connect(REPLAY_ADDRESS, &settings);
            for line in lines {
                match line {
                    Line::Callback(cb) => session.handle(cb),
                    Line::Marker(Marker::Timer) => ignore_timer(kind),
                }
            }
            tracing::info!(state = ?session.state(), "futures replay finished");
            render_requests::<FuturesRequest>(&session.api().requests)?
        }
        SessionKind::Options => {
            let lines: Vec<Line<OptionsCallback>> = load(input)?;
            let mut session = OptionsSession::new(
                RecordingApi::default(),
                Arc::clone(&directory),
                sink.clone(),
                gateway_name,
                0,
            );
            session.connect(REPLAY_ADDRESS, &settings);
            for line in lines {
                match line {
                    Line::Callback(cb) => session.handle(cb),
                    Line::Marker(Marker::Timer) => session.on_timer(),
                }
            }
            tracing::info!(state = ?session.state(), "options replay finished");
            render_requests::<OptionsRequest>(&session.api().requests)?
        }
        SessionKind::Md => {
            let lines: Vec<Line<MdCallback>> = load(input)?;
            let mut session = MdSession::new(
                RecordingApi::default(),
                Arc::clone(&directory),
                sink.clone(),
                gateway_name,
            );
            session.connect(REPLAY_ADDRESS, &settings);
            for line in lines {
                match line {
                    Line::Callback(cb) => session.handle(cb),
                    Line::Marker(Marker::Timer) => ignore_timer(kind),
                }
            }
            tracing::info!(state = ?session.state(), "market data replay finished");
            render_requests::<MdRequest>(&session.api().requests)?
        }
    };

    for event in sink.take() {
        println!("{}", serde_json::to_string(&json!({ "event": event }))?);
    }
    for line in requests {
        println!("{line}");
    }
    Ok(())
}

fn load<C: DeserializeOwned>(path: &str) -> Result<Vec<Line<C>>> {
    read_jsonl(path).with_context(|| format!("recorded stream {path}"))
}

fn preload(directory: &SharedDirectory, path: &str) -> Result<()> {
    let contracts: Vec<ContractData> =
        read_jsonl(path).with_context(|| format!("contracts file {path}"))?;
    tracing::info!(count = contracts.len(), "preloading contracts");
    for contract in contracts {
        directory.register(contract);
    }
    Ok(())
}

fn replay_settings() -> ConnectSettings {
    ConnectSettings {
        user_id: "replay".to_string(),
        party_id: "replay".to_string(),
        md_user: "replay".to_string(),
        ..Default::default()
    }
}

fn ignore_timer(kind: SessionKind) {
    tracing::debug!(?kind, "timer tick has no effect on this session");
}

fn render_requests<R: Serialize>(requests: &[(R, RequestId)]) -> Result<Vec<String>> {
    requests
        .iter()
        .map(|(request, id)| {
            serde_json::to_string(&json!({ "request_id": id, "request": request }))
                .context("request serialize failed")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_marker_is_not_a_callback() {
        let line: Line<OptionsCallback> = serde_json::from_str(r#"{"type":"timer"}"#).unwrap();
        assert!(matches!(line, Line::Marker(Marker::Timer)));

        let line: Line<MdCallback> = serde_json::from_str(r#"{"type":"front_connected"}"#).unwrap();
        assert!(matches!(line, Line::Callback(MdCallback::FrontConnected)));
    }

    #[test]
    fn recording_api_keeps_request_ids() {
        let mut api = RecordingApi::<FuturesRequest>::default();
        api.send(FuturesRequest::QryInstrument, 4).unwrap();
        let rendered = render_requests(&api.requests).unwrap();
        assert_eq!(rendered, vec![r#"{"request":{"type":"qry_instrument"},"request_id":4}"#]);
    }
}
