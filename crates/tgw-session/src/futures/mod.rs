//! Futures trading session.

mod order_id;
mod positions;
mod session;

pub use order_id::FuturesOrderId;
pub use positions::PositionAccumulator;
pub use session::{FuturesSession, FuturesState};
