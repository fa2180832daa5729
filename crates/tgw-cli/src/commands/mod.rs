//! Command handlers for the `tgw` binary.

pub mod config;
pub mod replay;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;

/// One JSON value per line; blank lines and `#` comments are skipped.
pub fn read_jsonl<T: DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read jsonl: {path}"))?;
    let mut out = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let v = serde_json::from_str(line)
            .with_context(|| format!("parse {path} line {}", i + 1))?;
        out.push(v);
    }
    Ok(out)
}
