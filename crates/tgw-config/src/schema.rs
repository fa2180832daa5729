use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tgw_session::RetryPolicy;

use crate::LoadedConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    Futures,
    Options,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub gateway: GatewaySection,
    #[serde(default)]
    pub connection: ConnectionSection,
    #[serde(default)]
    pub secrets_env: SecretsEnv,
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub retry: RetrySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewaySection {
    /// Defaults to the kind's conventional name when absent.
    #[serde(default)]
    pub name: Option<String>,
    pub kind: GatewayKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSection {
    pub user_id: String,
    pub party_id: String,
    pub trade_address: String,
    pub md_address: String,
    pub app_id: String,
    pub md_user: String,
}

/// Environment variable NAMES holding credentials. Never the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsEnv {
    pub password: String,
    pub auth_code: String,
    pub dev_code: String,
    pub dev_license: String,
    pub md_password: String,
}

impl Default for SecretsEnv {
    fn default() -> Self {
        Self {
            password: "TGW_PASSWORD".to_string(),
            auth_code: "TGW_AUTH_CODE".to_string(),
            dev_code: "TGW_DEV_CODE".to_string(),
            dev_license: "TGW_DEV_LICENSE".to_string(),
            md_password: "TGW_MD_PASSWORD".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSection {
    pub interval_ms: u64,
    pub query_every_ticks: u32,
    pub instrument_countdown_ticks: u32,
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            query_every_ticks: 2,
            instrument_countdown_ticks: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for RetrySection {
    fn default() -> Self {
        let p = RetryPolicy::default();
        Self {
            initial_delay_ms: p.initial_delay.as_millis() as u64,
            max_delay_ms: p.max_delay.as_millis() as u64,
            max_attempts: p.max_attempts,
        }
    }
}

impl GatewayConfig {
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        serde_json::from_value(loaded.config_json.clone()).context("config does not match gateway schema")
    }

    pub fn gateway_name(&self) -> String {
        match (&self.gateway.name, self.gateway.kind) {
            (Some(name), _) if !name.trim().is_empty() => name.trim().to_string(),
            (_, GatewayKind::Futures) => "NHFUTURES".to_string(),
            (_, GatewayKind::Options) => "NHSTOCK".to_string(),
        }
    }

    pub fn timer_interval(&self) -> Duration {
        Duration::from_millis(self.timer.interval_ms.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(self.retry.initial_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
            max_attempts: self.retry.max_attempts,
        }
    }
}
