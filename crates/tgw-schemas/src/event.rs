use serde::{Deserialize, Serialize};

use crate::{AccountData, ContractData, ExerciseData, OrderData, PositionData, TickData, TradeData};

/// Host-visible log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub msg: String,
    pub gateway_name: String,
}

/// Everything a session publishes to the host bus.
///
/// Exercise traffic uses its own variants so hosts can route it separately
/// from order/trade flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GatewayEvent {
    Tick(TickData),
    Order(OrderData),
    Trade(TradeData),
    Position(PositionData),
    Account(AccountData),
    Contract(ContractData),
    Log(LogEntry),
    Exercise(ExerciseData),
    /// Exercise failure text as returned by the broker.
    ExerciseLog(String),
}

impl GatewayEvent {
    /// Stable topic name, used by bus subscribers to filter.
    pub fn topic(&self) -> &'static str {
        match self {
            GatewayEvent::Tick(_) => "tick",
            GatewayEvent::Order(_) => "order",
            GatewayEvent::Trade(_) => "trade",
            GatewayEvent::Position(_) => "position",
            GatewayEvent::Account(_) => "account",
            GatewayEvent::Contract(_) => "contract",
            GatewayEvent::Log(_) => "log",
            GatewayEvent::Exercise(_) => "exercise",
            GatewayEvent::ExerciseLog(_) => "exercise_log",
        }
    }
}
