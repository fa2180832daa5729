use tgw_schemas::GatewayEvent;
use tgw_session::EventSink;
use tokio::sync::broadcast;

pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Broadcast bus carrying every normalized event to any number of host
/// subscribers. Slow subscribers lag; publishing never blocks.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<GatewayEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl EventSink for EventBus {
    fn publish(&self, event: GatewayEvent) {
        // No subscribers is not an error.
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgw_schemas::LogEntry;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        bus.publish(GatewayEvent::ExerciseLog("no position".into()));
        bus.publish(GatewayEvent::Log(LogEntry {
            msg: "hello".into(),
            gateway_name: "G".into(),
        }));

        assert_eq!(rx.recv().await.unwrap().topic(), "exercise_log");
        assert_eq!(rx.recv().await.unwrap().topic(), "log");
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new(4);
        bus.publish(GatewayEvent::ExerciseLog("x".into()));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
