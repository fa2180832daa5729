use std::sync::Mutex;

use tgw_schemas::{
    AccountData, ContractData, ExerciseData, GatewayEvent, OrderData, PositionData, TickData,
    TradeData,
};
use tgw_session::EventSink;

/// Keeps every published event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GatewayEvent>>,
}

macro_rules! select {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Vec<$ty> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    GatewayEvent::$variant(v) => Some(v),
                    _ => None,
                })
                .collect()
        }
    };
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GatewayEvent> {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn take(&self) -> Vec<GatewayEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|p| p.into_inner()))
    }

    pub fn topics(&self) -> Vec<&'static str> {
        self.events().iter().map(GatewayEvent::topic).collect()
    }

    pub fn logs(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                GatewayEvent::Log(l) => Some(l.msg),
                _ => None,
            })
            .collect()
    }

    select!(ticks, Tick, TickData);
    select!(orders, Order, OrderData);
    select!(trades, Trade, TradeData);
    select!(positions, Position, PositionData);
    select!(accounts, Account, AccountData);
    select!(contracts, Contract, ContractData);
    select!(exercises, Exercise, ExerciseData);
    select!(exercise_logs, ExerciseLog, String);
}

impl EventSink for RecordingSink {
    fn publish(&self, event: GatewayEvent) {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }
}
