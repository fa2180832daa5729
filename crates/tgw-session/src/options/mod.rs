//! Stock-option trading session.

mod index;
mod session;

pub use index::option_index;
pub use session::{seed_order_ref, OptionsSession, OptionsState, INSTRUMENT_COUNTDOWN_TICKS};
