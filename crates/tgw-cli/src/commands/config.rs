use anyhow::{bail, Context, Result};
use tgw_config::{load_layered_yaml, resolve_connect_settings, unused_keys, GatewayConfig};

pub fn check(config_paths: &[String], strict: bool) -> Result<()> {
    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = load_layered_yaml(&path_refs)?;
    let cfg = GatewayConfig::from_loaded(&loaded)?;

    let unused = unused_keys(&loaded.config_json);
    for key in &unused {
        tracing::warn!(key = %key, "config key is not read by the gateway");
        println!("unused_key={key}");
    }
    if strict && !unused.is_empty() {
        bail!("CONFIG_UNUSED_KEYS count={}", unused.len());
    }

    let settings = resolve_connect_settings(&cfg).context("credential resolution failed")?;

    println!("config_hash={}", loaded.config_hash);
    println!("gateway_name={}", cfg.gateway_name());
    println!("gateway_kind={:?}", cfg.gateway.kind);
    println!("timer_interval_ms={}", cfg.timer_interval().as_millis());
    println!("settings={settings:?}");
    Ok(())
}
