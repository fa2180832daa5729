//! Startup resolution of connection credentials.
//!
//! Config stores env var NAMES only. [`resolve_connect_settings`] reads the
//! values once and returns a [`ConnectSettings`] whose `Debug` is redacted.
//! Errors name the env var, never its value.

use anyhow::{bail, Result};
use tgw_schemas::ConnectSettings;

use crate::GatewayConfig;

pub fn resolve_connect_settings(cfg: &GatewayConfig) -> Result<ConnectSettings> {
    resolve_connect_settings_with(cfg, |name| std::env::var(name).ok())
}

/// Same as [`resolve_connect_settings`] with an explicit lookup.
pub fn resolve_connect_settings_with<F>(cfg: &GatewayConfig, lookup: F) -> Result<ConnectSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let resolve = |var: &str| -> Option<String> {
        if var.trim().is_empty() {
            return None;
        }
        lookup(var).filter(|v| !v.trim().is_empty())
    };

    let names = &cfg.secrets_env;
    let Some(password) = resolve(&names.password) else {
        bail!(
            "SECRETS_MISSING trading password: env var {} is not set",
            names.password
        );
    };

    let conn = &cfg.connection;
    if conn.user_id.trim().is_empty() {
        bail!("CONFIG_INVALID connection.user_id is empty");
    }

    let md_user = if conn.md_user.is_empty() {
        conn.user_id.clone()
    } else {
        conn.md_user.clone()
    };
    let md_password = resolve(&names.md_password).unwrap_or_else(|| password.clone());

    Ok(ConnectSettings {
        user_id: conn.user_id.clone(),
        password,
        party_id: conn.party_id.clone(),
        trade_address: conn.trade_address.clone(),
        md_address: conn.md_address.clone(),
        app_id: conn.app_id.clone(),
        auth_code: resolve(&names.auth_code).unwrap_or_default(),
        dev_code: resolve(&names.dev_code).unwrap_or_default(),
        dev_license: resolve(&names.dev_license).unwrap_or_default(),
        md_user,
        md_password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{load_layered_yaml_from_strings, GatewayConfig};
    use std::collections::HashMap;

    fn cfg() -> GatewayConfig {
        let loaded = load_layered_yaml_from_strings(&[
            "gateway:\n  kind: futures\nconnection:\n  user_id: \"8001\"\n  party_id: \"9999\"\n",
        ])
        .unwrap();
        GatewayConfig::from_loaded(&loaded).unwrap()
    }

    #[test]
    fn missing_password_names_the_variable() {
        let err = resolve_connect_settings_with(&cfg(), |_| None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SECRETS_MISSING"));
        assert!(msg.contains("TGW_PASSWORD"));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let err = resolve_connect_settings_with(&cfg(), |_| Some("   ".to_string())).unwrap_err();
        assert!(err.to_string().contains("TGW_PASSWORD"));
    }

    #[test]
    fn md_credentials_fall_back_to_trading_ones() {
        let env: HashMap<&str, &str> = [("TGW_PASSWORD", "pw"), ("TGW_AUTH_CODE", "ac")].into();
        let s = resolve_connect_settings_with(&cfg(), |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(s.password, "pw");
        assert_eq!(s.auth_code, "ac");
        assert_eq!(s.md_user, "8001");
        assert_eq!(s.md_password, "pw");
        assert_eq!(s.dev_code, "");
    }
}
