// SPDX-License-Identifier: GPL-3.0-only

use tokio::sync::broadcast;
use tracing::{debug, warn};

use volumes_types::DeviceEvent;

/// Fan-out of normalized device events to any number of subscribers.
#[derive(Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventEmitter {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn emit(&self, event: DeviceEvent) {
        debug!("{} {}", event.name(), event.id());
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> DeviceEventStream {
        DeviceEventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(64)
    }
}

pub struct DeviceEventStream {
    receiver: broadcast::Receiver<DeviceEvent>,
}

impl DeviceEventStream {
    /// Next event, or `None` once every emitter is gone.
    pub async fn recv(&mut self) -> Option<DeviceEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Device event subscriber lagged, {skipped} events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<DeviceEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Device event subscriber lagged, {skipped} events dropped");
                }
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volumes_types::DeviceId;

    #[tokio::test]
    async fn every_subscriber_sees_each_event() {
        let emitter = EventEmitter::default();
        let mut first = emitter.subscribe();
        let mut second = emitter.subscribe();

        let event = DeviceEvent::Removed {
            id: DeviceId::from("/org/freedesktop/UDisks/devices/sdb"),
        };
        emitter.emit(event.clone());

        assert_eq!(first.recv().await, Some(event.clone()));
        assert_eq!(second.recv().await, Some(event));
        assert_eq!(first.try_recv(), None);
    }

    #[tokio::test]
    async fn stream_ends_when_emitter_dropped() {
        let emitter = EventEmitter::default();
        let mut events = emitter.subscribe();
        drop(emitter);
        assert_eq!(events.recv().await, None);
    }

    #[test]
    fn emitting_without_subscribers_is_silent() {
        EventEmitter::default().emit(DeviceEvent::Removed {
            id: DeviceId::from("/org/freedesktop/UDisks/devices/sdb"),
        });
    }
}
