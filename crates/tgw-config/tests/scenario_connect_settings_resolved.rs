//! Scenario: layered files on disk resolve to connection settings.
//!
//! GREEN when:
//! - files are merged in order from disk
//! - the schema picks up timer and retry overrides
//! - credentials come from the named env vars and never show in `Debug`

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use tgw_config::{
    load_layered_yaml, resolve_connect_settings_with, GatewayConfig, GatewayKind,
};

fn write_yaml(dir: &tempfile::TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn files_merge_and_resolve() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_yaml(
        &dir,
        "base.yaml",
        r#"
gateway:
  kind: options
connection:
  user_id: "1001"
  party_id: "P01"
  trade_address: "10.1.1.1:6001"
  md_address: "10.1.1.1:6002"
secrets_env:
  password: SOPT_PASSWORD
  md_password: SOPT_MD_PASSWORD
"#,
    );
    let overlay = write_yaml(
        &dir,
        "prod.yaml",
        r#"
timer:
  instrument_countdown_ticks: 3
retry:
  initial_delay_ms: 100
  max_delay_ms: 400
  max_attempts: 4
"#,
    );

    let loaded = load_layered_yaml(&[base.as_str(), overlay.as_str()]).unwrap();
    let cfg = GatewayConfig::from_loaded(&loaded).unwrap();
    assert_eq!(cfg.gateway.kind, GatewayKind::Options);
    assert_eq!(cfg.gateway_name(), "NHSTOCK");
    assert_eq!(cfg.timer.instrument_countdown_ticks, 3);
    assert_eq!(cfg.timer.query_every_ticks, 2);
    let retry = cfg.retry_policy();
    assert_eq!(retry.initial_delay, Duration::from_millis(100));
    assert_eq!(retry.max_delay, Duration::from_millis(400));
    assert_eq!(retry.max_attempts, 4);

    let env: HashMap<&str, &str> = [("SOPT_PASSWORD", "s3cret"), ("SOPT_MD_PASSWORD", "mdpw")].into();
    let settings =
        resolve_connect_settings_with(&cfg, |k| env.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(settings.user_id, "1001");
    assert_eq!(settings.party_id, "P01");
    assert_eq!(settings.password, "s3cret");
    assert_eq!(settings.md_password, "mdpw");

    let dbg = format!("{settings:?}");
    assert!(!dbg.contains("s3cret"));
    assert!(!dbg.contains("mdpw"));
    assert!(dbg.contains("<REDACTED>"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");
    let missing = missing.to_string_lossy().into_owned();
    let err = load_layered_yaml(&[missing.as_str()]).unwrap_err();
    assert!(err.to_string().contains("failed to read yaml path"));
}
