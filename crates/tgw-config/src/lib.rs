//! tgw-config
//!
//! Layered YAML configuration for a gateway process.
//!
//! - Documents are deep-merged in order; later layers override earlier ones.
//! - The merged tree is rejected if any string leaf looks like a literal
//!   credential. Credentials are referenced by environment variable NAME
//!   under `secrets_env` and resolved at startup ([`resolve_connect_settings`]).
//! - The canonical JSON rendering is hashed (SHA-256, hex) so operators can
//!   tell whether two deployments run the same configuration.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

mod schema;
mod secrets;

pub use schema::{
    ConnectionSection, GatewayConfig, GatewayKind, GatewaySection, RetrySection, SecretsEnv,
    TimerSection,
};
pub use secrets::{resolve_connect_settings, resolve_connect_settings_with};

/// Leaf strings starting with one of these are treated as pasted credentials.
const SECRET_PREFIXES: &[&str] = &[
    "-----BEGIN", // PEM private keys
    "sk-",
    "AKIA",
    "ghp_",
];

/// JSON-pointer prefixes the gateway reads. Anything else is reported by
/// [`unused_keys`].
const CONSUMED_PREFIXES: &[&str] = &[
    "/gateway",
    "/connection",
    "/secrets_env",
    "/timer",
    "/retry",
];

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::with_capacity(paths.len());
    for p in paths {
        let raw = fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for (i, raw) in yaml_docs.iter().enumerate() {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Leaf pointers outside the sections the gateway reads, sorted.
pub fn unused_keys(config_json: &Value) -> Vec<String> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);
    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|leaf| !CONSUMED_PREFIXES.iter().any(|p| is_prefix_pointer(p, leaf)))
        .collect();
    unused.sort();
    unused
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

/// `serde_json::Map` is ordered by key, so the compact rendering is canonical.
fn canonicalize_json(v: &Value) -> Result<String> {
    serde_json::to_string(v).context("canonical json serialize failed")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        let Some(s) = v.pointer(&ptr).and_then(Value::as_str) else {
            continue;
        };
        if looks_like_secret(s) {
            bail!("CONFIG_SECRET_DETECTED leaf={ptr} value=REDACTED");
        }
        if ptr.starts_with("/secrets_env/") && !is_env_var_name(s) {
            bail!("CONFIG_SECRET_DETECTED leaf={ptr} is not an environment variable name");
        }
    }
    Ok(())
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    t.len() >= 8 && SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}

/// `[A-Z_][A-Z0-9_]*`
fn is_env_var_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                let next = format!("{prefix}/{}", k.replace('~', "~0").replace('/', "~1"));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_pointers(vv, &format!("{prefix}/{i}"), out);
            }
        }
        _ => out.push(if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        }),
    }
}

/// "/a/b" covers "/a/b" and "/a/b/c" but not "/a/bc".
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    leaf == prefix
        || (leaf.starts_with(prefix) && leaf.as_bytes().get(prefix.len()) == Some(&b'/'))
}
