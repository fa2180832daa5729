use serde::{Deserialize, Serialize};
use std::fmt;

use tgw_schemas::{Offset, OrderType};

/// Request correlation id as carried by the native API.
pub type RequestId = i32;

// ---------------------------------------------------------------------------
// RequestSeq
// ---------------------------------------------------------------------------

/// Per-session request id allocator. Ids are strictly increasing and start at 1.
#[derive(Debug, Clone, Default)]
pub struct RequestSeq {
    last: RequestId,
}

impl RequestSeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> RequestId {
        self.last += 1;
        self.last
    }

    /// Last id handed out (0 before the first request).
    pub fn last(&self) -> RequestId {
        self.last
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Error descriptor attached to every response callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RspInfo {
    pub error_id: i32,
    pub error_msg: String,
}

impl RspInfo {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn error(error_id: i32, error_msg: impl Into<String>) -> Self {
        Self {
            error_id,
            error_msg: error_msg.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_id != 0
    }
}

/// Correlation metadata attached to every response callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RspMeta {
    pub request_id: RequestId,
    /// Last record of a paginated response.
    pub is_last: bool,
}

impl Default for RspMeta {
    fn default() -> Self {
        Self {
            request_id: 0,
            is_last: true,
        }
    }
}

/// Host-visible rendering of a protocol error.
pub fn protocol_error_message(context: &str, info: &RspInfo) -> String {
    format!(
        "{context}, code: {}, message: {}",
        info.error_id, info.error_msg
    )
}

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Non-zero return code from a native request call.
///
/// The futures API uses a non-zero code on the instrument query to signal
/// that the query channel is busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendError {
    pub code: i32,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native request failed with return code {}", self.code)
    }
}

impl std::error::Error for SendError {}

pub type SendResult = Result<(), SendError>;

/// Opaque callback-driven RPC client for one session kind.
///
/// `R` is the session's request enum. Callbacks travel the other way and are
/// fed into the owning session's `handle` method by whatever drives the
/// transport.
pub trait NativeApi<R> {
    /// Register the front address and start the async connect.
    fn open(&mut self, address: &str);
    fn send(&mut self, request: R, request_id: RequestId) -> SendResult;
    fn close(&mut self);
}

impl<R, T: NativeApi<R> + ?Sized> NativeApi<R> for Box<T> {
    fn open(&mut self, address: &str) {
        (**self).open(address)
    }

    fn send(&mut self, request: R, request_id: RequestId) -> SendResult {
        (**self).send(request, request_id)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

// ---------------------------------------------------------------------------
// Local validation
// ---------------------------------------------------------------------------

/// Order/cancel request rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnsupportedOffset(Offset),
    UnsupportedOrderType(OrderType),
    /// Cancel target is not a `{front}_{session}_{ref}` id.
    MalformedOrderId(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnsupportedOffset(o) => {
                write!(f, "please choose an open/close offset (got {o})")
            }
            ValidationError::UnsupportedOrderType(t) => {
                write!(f, "order type {t} is not supported by this gateway")
            }
            ValidationError::MalformedOrderId(id) => write!(f, "malformed order id '{id}'"),
        }
    }
}

impl std::error::Error for ValidationError {}
