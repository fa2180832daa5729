//! Symbol → contract directory.
//!
//! # Contract
//!
//! - [`ContractDirectory::register`] inserts or overwrites by symbol
//!   (last write wins, idempotent for identical contracts).
//! - [`ContractDirectory::lookup`] returns `None` for unknown symbols. Callers
//!   decide whether that drops the record or buffers it.
//!
//! # Sharing
//!
//! One directory is created per gateway instance and handed to every session
//! as a [`SharedDirectory`]. The trading session that runs the contract query
//! is the only writer; the market-data session only reads. The lock is held
//! for single map operations only, never across a callback.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tgw_schemas::ContractData;

pub type SharedDirectory = Arc<ContractDirectory>;

#[derive(Debug, Default)]
pub struct ContractDirectory {
    contracts: RwLock<HashMap<String, Arc<ContractData>>>,
}

impl ContractDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedDirectory {
        Arc::new(Self::new())
    }

    /// Insert or replace the contract keyed by its symbol.
    pub fn register(&self, contract: ContractData) {
        let symbol = contract.symbol.clone();
        let mut map = self
            .contracts
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if map.insert(symbol.clone(), Arc::new(contract)).is_some() {
            tracing::debug!(symbol = %symbol, "contract replaced");
        }
    }

    pub fn lookup(&self, symbol: &str) -> Option<Arc<ContractData>> {
        let map = self
            .contracts
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.get(symbol).cloned()
    }

    pub fn len(&self) -> usize {
        self.contracts
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
