//! tgw-protocol
//!
//! Wire-level vocabulary of the broker's native SDK:
//!
//! - single-character protocol codes ([`codes`])
//! - typed request/callback payloads per session kind ([`md`], [`futures`], [`options`])
//! - bidirectional mapping tables between codes and normalized enums ([`mapping`])
//! - the [`NativeApi`] transport seam and the request-id sequence
//!
//! Nothing here holds session state. Sessions in `tgw-session` own a
//! `NativeApi` implementation and feed its callbacks through `handle`.

mod api;
pub mod codes;
pub mod futures;
pub mod mapping;
pub mod md;
pub mod options;

pub use api::{
    protocol_error_message, NativeApi, RequestId, RequestSeq, RspInfo, RspMeta, SendError,
    SendResult, ValidationError,
};
