//! tgw-session
//!
//! Protocol state machines for the three broker sessions:
//!
//! - [`MdSession`]: market-data connect/login, subscription replay, tick normalization
//! - [`FuturesSession`]: authenticate → login → settlement confirm → contract query,
//!   order/trade reconciliation, paginated position aggregation
//! - [`OptionsSession`]: login → countdown-gated contract query, client-order-id
//!   reconciliation, exercise workflow
//!
//! Every session owns its [`tgw_protocol::NativeApi`] transport, reads and
//! writes the injected [`tgw_directory::SharedDirectory`], and publishes
//! normalized [`tgw_schemas::GatewayEvent`]s through an [`EventSink`].
//!
//! Callbacks for one session are delivered sequentially through its `handle`
//! method; sessions are not internally synchronized.

pub mod futures;
mod md;
pub mod options;
mod replay;
mod retry;
mod sink;
pub mod time;

pub use futures::{FuturesOrderId, FuturesSession, FuturesState};
pub use md::{MdSession, MdState};
pub use options::{OptionsSession, OptionsState};
pub use replay::ReplayBuffer;
pub use retry::{RetryExhausted, RetryPolicy};
pub use sink::{Emitter, EventSink};
