use crate::domain::events::DomainEvent;
use crate::domain::ports::EventPublisher;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

const DEFAULT_CAPACITY: usize = 256;

/// Publish/subscribe fan-out for domain events.
///
/// Owned by whoever wires the application together and handed to the
/// engine explicitly. Clones share one channel. Publishing with nobody
/// subscribed is not an error; the event is dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Subscribers lagging more than `capacity` events behind lose the oldest.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Subscribes a task that logs every event until all senders are gone.
    pub fn spawn_logger(&self) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => info!(
                        event = event.name(),
                        request_id = %event.request_id(),
                        "{}",
                        serde_json::to_string(&event).unwrap_or_default()
                    ),
                    Err(RecvError::Lagged(missed)) => warn!(missed, "Event logger fell behind"),
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: DomainEvent) {
        let name = event.name();
        let request_id = event.request_id();
        match self.sender.send(event) {
            Ok(receivers) => debug!(event = name, %request_id, receivers, "Published event"),
            Err(_) => trace!(event = name, %request_id, "No subscribers for event"),
        }
    }
}
