use std::sync::Arc;

use tgw_protocol::{protocol_error_message, RspInfo};
use tgw_schemas::{GatewayEvent, LogEntry};

/// Host-side receiver of normalized events.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: GatewayEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: GatewayEvent) {
        (**self).publish(event)
    }
}

/// Per-session publishing handle: stamps the gateway name on log lines and
/// mirrors every host-visible log into `tracing`.
#[derive(Clone)]
pub struct Emitter {
    gateway_name: String,
    sink: Arc<dyn EventSink>,
}

impl Emitter {
    pub fn new(gateway_name: impl Into<String>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            gateway_name: gateway_name.into(),
            sink,
        }
    }

    pub fn gateway_name(&self) -> &str {
        &self.gateway_name
    }

    pub fn publish(&self, event: GatewayEvent) {
        self.sink.publish(event);
    }

    pub fn write_log(&self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::info!(gateway = %self.gateway_name, "{msg}");
        self.sink.publish(GatewayEvent::Log(LogEntry {
            msg,
            gateway_name: self.gateway_name.clone(),
        }));
    }

    /// Surface a non-zero protocol error as a log line.
    pub fn write_error(&self, context: &str, info: &RspInfo) {
        let msg = protocol_error_message(context, info);
        tracing::warn!(
            gateway = %self.gateway_name,
            error_id = info.error_id,
            "{msg}"
        );
        self.sink.publish(GatewayEvent::Log(LogEntry {
            msg,
            gateway_name: self.gateway_name.clone(),
        }));
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("gateway_name", &self.gateway_name)
            .finish_non_exhaustive()
    }
}
