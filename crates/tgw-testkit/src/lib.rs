//! tgw-testkit
//!
//! Offline harness for the gateway sessions: a scripted [`NativeApi`]
//! transport, an in-memory [`EventSink`], payload fixtures, and helpers to
//! drive a session through its login pipeline. Nothing here touches a
//! network.
//!
//! [`NativeApi`]: tgw_protocol::NativeApi
//! [`EventSink`]: tgw_session::EventSink

use std::fs;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

pub mod fixtures;
mod sink;
mod transport;

pub use sink::RecordingSink;
pub use transport::ScriptedApi;

/// Read a recorded callback stream: one JSON value per line, blank lines and
/// `#` comments ignored.
pub fn load_jsonl<T: DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read jsonl: {path}"))?;
    parse_jsonl(&raw).with_context(|| format!("parse jsonl: {path}"))
}

pub fn parse_jsonl<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let v = serde_json::from_str(line).with_context(|| format!("line {}", i + 1))?;
        out.push(v);
    }
    Ok(out)
}
