use tokio::sync::broadcast;
use tracing::trace;

use crate::dto::sse::ServerEvent;

/// Fan-out of match events to every connected SSE view.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Hub keeping at most `capacity` undelivered events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every event broadcast from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Number of views currently listening.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Deliver `event` to the current subscribers. Having none is not an error.
    pub fn broadcast(&self, event: ServerEvent) {
        match self.sender.send(event) {
            Ok(delivered) => trace!(delivered, "match event broadcast"),
            Err(_) => trace!("match event dropped; no subscriber"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events_sent_after_joining() {
        let hub = SseHub::new(4);
        hub.broadcast(ServerEvent::new(None, "early".into()));
        assert_eq!(hub.subscriber_count(), 0);

        let mut receiver = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);
        hub.broadcast(ServerEvent::new(Some("info".into()), "late".into()));

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.data, "late");
        assert_eq!(event.event.as_deref(), Some("info"));
    }
}
