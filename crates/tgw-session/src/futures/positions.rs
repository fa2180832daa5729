//! Per-cycle position aggregation for paginated position queries.
//!
//! The broker returns one record per (symbol, direction, position date), so a
//! single holding can span several pages. Records are merged by
//! `(symbol, direction)`; everything stored is a running sum so the merged
//! result does not depend on page order. Average price is derived from the
//! summed cost only when the cycle is flushed.

use std::collections::BTreeMap;

use tgw_protocol::futures::InvestorPositionField;
use tgw_protocol::mapping::direction_from_futures;
use tgw_schemas::{ContractData, Direction, Exchange, PositionData};

#[derive(Debug, Clone)]
struct Entry {
    position: PositionData,
    cost: f64,
    size: f64,
}

#[derive(Debug, Default)]
pub struct PositionAccumulator {
    gateway_name: String,
    entries: BTreeMap<(String, Direction), Entry>,
}

impl PositionAccumulator {
    pub fn new(gateway_name: impl Into<String>) -> Self {
        Self {
            gateway_name: gateway_name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Fold one record into the cycle. Returns `false` when the record's
    /// direction code is not recognized (record ignored).
    pub fn merge(&mut self, rec: &InvestorPositionField, contract: &ContractData) -> bool {
        let Some(direction) = direction_from_futures(rec.posi_direction) else {
            return false;
        };

        let key = (rec.instrument_id.clone(), direction);
        let gateway_name = &self.gateway_name;
        let entry = self.entries.entry(key).or_insert_with(|| Entry {
            position: PositionData::new(
                rec.instrument_id.clone(),
                contract.exchange,
                direction,
                gateway_name.clone(),
            ),
            cost: 0.0,
            size: contract.size,
        });

        let pos = &mut entry.position;
        // SHFE/INE split today and yesterday into separate records.
        if matches!(pos.exchange, Exchange::SHFE | Exchange::INE) {
            if rec.yd_position != 0 && rec.today_position == 0 {
                pos.yd_volume += rec.position;
            }
        } else {
            pos.yd_volume += rec.position - rec.today_position;
        }

        pos.volume += rec.position;
        pos.pnl += rec.position_profit;
        entry.cost += rec.position_cost;

        // Long holdings are frozen by pending sell-closes and vice versa.
        match direction {
            Direction::Long => pos.frozen += rec.short_frozen,
            Direction::Short => pos.frozen += rec.long_frozen,
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// End the cycle: finalize average prices and clear the accumulator.
    pub fn drain(&mut self) -> Vec<PositionData> {
        std::mem::take(&mut self.entries)
            .into_values()
            .map(|e| {
                let mut p = e.position;
                let divisor = p.volume as f64 * e.size;
                p.price = if divisor != 0.0 { e.cost / divisor } else { 0.0 };
                p
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::futures_contract;
    use tgw_protocol::codes::futures::{PD_LONG, PD_SHORT};

    fn rec(symbol: &str, dir: char, pos: i64, today: i64, yd: i64, cost: f64) -> InvestorPositionField {
        InvestorPositionField {
            instrument_id: symbol.to_string(),
            posi_direction: dir,
            position: pos,
            today_position: today,
            yd_position: yd,
            position_cost: cost,
            position_profit: 10.0,
            long_frozen: 1,
            short_frozen: 2,
        }
    }

    #[test]
    fn merges_pages_into_weighted_average() {
        let c = futures_contract("IF2406", Exchange::CFFEX, 300.0);
        let mut acc = PositionAccumulator::new("FUT");
        acc.merge(&rec("IF2406", PD_LONG, 2, 0, 2, 2.0 * 300.0 * 3500.0), &c);
        acc.merge(&rec("IF2406", PD_LONG, 1, 1, 0, 300.0 * 3530.0), &c);
        let out = acc.drain();
        assert_eq!(out.len(), 1);
        let p = &out[0];
        assert_eq!(p.volume, 3);
        assert_eq!(p.yd_volume, 2);
        assert_eq!(p.frozen, 4);
        assert_eq!(p.pnl, 20.0);
        assert!((p.price - 3510.0).abs() < 1e-9);
        assert!(acc.is_empty());
    }

    #[test]
    fn shfe_yesterday_only_from_pure_yesterday_records() {
        let c = futures_contract("cu2407", Exchange::SHFE, 5.0);
        let mut acc = PositionAccumulator::new("FUT");
        acc.merge(&rec("cu2407", PD_SHORT, 3, 0, 3, 3.0 * 5.0 * 70000.0), &c);
        acc.merge(&rec("cu2407", PD_SHORT, 2, 2, 3, 2.0 * 5.0 * 71000.0), &c);
        let p = acc.drain().remove(0);
        assert_eq!(p.direction, Direction::Short);
        assert_eq!(p.volume, 5);
        assert_eq!(p.yd_volume, 3);
        assert_eq!(p.frozen, 2);
    }

    #[test]
    fn zero_volume_gives_zero_price() {
        let c = futures_contract("m2409", Exchange::DCE, 10.0);
        let mut acc = PositionAccumulator::new("FUT");
        acc.merge(&rec("m2409", PD_LONG, 0, 0, 0, 0.0), &c);
        assert_eq!(acc.drain()[0].price, 0.0);
    }

    #[test]
    fn unknown_direction_is_ignored() {
        let c = futures_contract("m2409", Exchange::DCE, 10.0);
        let mut acc = PositionAccumulator::new("FUT");
        assert!(!acc.merge(&rec("m2409", '9', 1, 0, 1, 10.0), &c));
        assert!(acc.is_empty());
    }
}
