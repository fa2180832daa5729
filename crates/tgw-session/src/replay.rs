//! Buffer for private-stream updates that arrive before reference data.
//!
//! Until [`ReplayBuffer::release`] is called, order and trade updates are
//! held in arrival order. `release` flips the buffer to pass-through and
//! hands back everything held exactly once: all orders (arrival order), then
//! all trades (arrival order). Orders go first so trade reconciliation can
//! see the exchange-id mappings they populate.

#[derive(Debug)]
pub struct ReplayBuffer<O, T> {
    released: bool,
    orders: Vec<O>,
    trades: Vec<T>,
}

impl<O, T> Default for ReplayBuffer<O, T> {
    fn default() -> Self {
        Self {
            released: false,
            orders: Vec::new(),
            trades: Vec::new(),
        }
    }
}

impl<O, T> ReplayBuffer<O, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Returns the order back if it can be processed now, else holds it.
    pub fn admit_order(&mut self, order: O) -> Option<O> {
        if self.released {
            Some(order)
        } else {
            self.orders.push(order);
            None
        }
    }

    /// Returns the trade back if it can be processed now, else holds it.
    pub fn admit_trade(&mut self, trade: T) -> Option<T> {
        if self.released {
            Some(trade)
        } else {
            self.trades.push(trade);
            None
        }
    }

    pub fn held(&self) -> usize {
        self.orders.len() + self.trades.len()
    }

    /// Switch to pass-through and drain everything held so far.
    pub fn release(&mut self) -> (Vec<O>, Vec<T>) {
        self.released = true;
        (
            std::mem::take(&mut self.orders),
            std::mem::take(&mut self.trades),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_until_released_then_passes_through() {
        let mut buf: ReplayBuffer<u32, &str> = ReplayBuffer::new();
        assert!(buf.admit_order(1).is_none());
        assert!(buf.admit_trade("t1").is_none());
        assert!(buf.admit_order(2).is_none());
        assert_eq!(buf.held(), 3);

        let (orders, trades) = buf.release();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(trades, vec!["t1"]);
        assert_eq!(buf.held(), 0);

        assert_eq!(buf.admit_order(3), Some(3));
        assert_eq!(buf.admit_trade("t2"), Some("t2"));
    }

    #[test]
    fn second_release_yields_nothing() {
        let mut buf: ReplayBuffer<u32, u32> = ReplayBuffer::new();
        buf.admit_order(7);
        let _ = buf.release();
        let (orders, trades) = buf.release();
        assert!(orders.is_empty());
        assert!(trades.is_empty());
    }
}
