//! Scenario: config-hash and config-check CLI commands.
//!
//! GREEN when:
//! - `tgw config-hash` prints a stable 64-hex hash and the canonical JSON.
//! - Layer order matters: a later layer's leaf wins.
//! - `tgw config-check` fails naming the missing password variable, and
//!   never prints the resolved password once it is set.
//! - `--strict` rejects keys the gateway does not read.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const BASE: &str = "gateway:\n  kind: futures\nconnection:\n  user_id: \"8001\"\n  party_id: \"9999\"\n  trade_address: \"10.0.0.1:41205\"\n";
const OVERLAY: &str = "connection:\n  party_id: \"4040\"\n";

fn write(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

fn hash_line(out: &[u8]) -> String {
    String::from_utf8_lossy(out)
        .lines()
        .find(|l| l.starts_with("config_hash="))
        .unwrap()
        .to_string()
}

#[test]
fn config_hash_is_stable_and_layered() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.yaml", BASE);
    let overlay = write(&dir, "overlay.yaml", OVERLAY);

    let first = Command::cargo_bin("tgw")
        .unwrap()
        .args(["config-hash", &base, &overlay])
        .output()
        .unwrap();
    assert!(first.status.success());
    let second = Command::cargo_bin("tgw")
        .unwrap()
        .args(["config-hash", &base, &overlay])
        .output()
        .unwrap();
    assert_eq!(hash_line(&first.stdout), hash_line(&second.stdout));
    assert_eq!(hash_line(&first.stdout).len(), "config_hash=".len() + 64);

    Command::cargo_bin("tgw")
        .unwrap()
        .args(["config-hash", &base, &overlay])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""party_id":"4040""#));

    let base_only = Command::cargo_bin("tgw")
        .unwrap()
        .args(["config-hash", &base])
        .output()
        .unwrap();
    assert_ne!(hash_line(&first.stdout), hash_line(&base_only.stdout));
}

#[test]
fn config_check_requires_password_env() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.yaml", BASE);

    Command::cargo_bin("tgw")
        .unwrap()
        .current_dir(dir.path())
        .env_remove("TGW_PASSWORD")
        .args(["config-check", "--config", &base])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TGW_PASSWORD"));
}

#[test]
fn config_check_redacts_resolved_secrets() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.yaml", BASE);

    Command::cargo_bin("tgw")
        .unwrap()
        .current_dir(dir.path())
        .env("TGW_PASSWORD", "pw-very-private")
        .args(["config-check", "--config", &base])
        .assert()
        .success()
        .stdout(predicate::str::contains("gateway_name=NHFUTURES"))
        .stdout(predicate::str::contains("pw-very-private").not());
}

#[test]
fn strict_check_rejects_unread_keys() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.yaml", BASE);
    let extra = write(&dir, "extra.yaml", "risk:\n  max_drawdown: 0.1\n");

    Command::cargo_bin("tgw")
        .unwrap()
        .current_dir(dir.path())
        .env("TGW_PASSWORD", "pw")
        .args(["config-check", "--strict", "--config", &base, "--config", &extra])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unused_key=/risk/max_drawdown"))
        .stderr(predicate::str::contains("CONFIG_UNUSED_KEYS"));
}
