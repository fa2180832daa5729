//! Scenario: config hash is stable under key reordering and sensitive to values.
//!
//! GREEN when:
//! - the same layers hash identically across calls
//! - reordering keys inside a document does not change the hash
//! - an overlay that changes a value changes the hash

use tgw_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
gateway:
  kind: futures
  name: NHFUTURES
connection:
  user_id: "8001"
  party_id: "9999"
  trade_address: "10.0.0.1:41205"
  md_address: "10.0.0.1:41213"
secrets_env:
  password: TGW_PASSWORD
timer:
  interval_ms: 1000
"#;

const BASE_YAML_REORDERED: &str = r#"
timer:
  interval_ms: 1000
secrets_env:
  password: TGW_PASSWORD
connection:
  md_address: "10.0.0.1:41213"
  trade_address: "10.0.0.1:41205"
  party_id: "9999"
  user_id: "8001"
gateway:
  name: NHFUTURES
  kind: futures
"#;

const OVERLAY_YAML: &str = r#"
timer:
  interval_ms: 500
"#;

#[test]
fn same_input_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.config_hash.len(), 64);
}

#[test]
fn key_order_does_not_matter() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(a.canonical_json, b.canonical_json);
    assert_eq!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_changes_hash_and_value() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let merged = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_ne!(base.config_hash, merged.config_hash);
    assert_eq!(merged.config_json.pointer("/timer/interval_ms").unwrap(), 500);
    assert_eq!(
        merged.config_json.pointer("/connection/user_id").unwrap(),
        "8001"
    );
}
