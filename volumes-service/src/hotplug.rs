// SPDX-License-Identifier: GPL-3.0-only

//! Translation of storage-service hotplug signals into device events

use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use volumes_contracts::DeviceSignalStream;
use volumes_types::{DeviceEvent, DeviceSignal};

use crate::client::DeviceQueryClient;
use crate::events::EventEmitter;
use crate::policies::VolumeFilter;

pub struct HotplugSubscriber {
    client: DeviceQueryClient,
    filter: Arc<VolumeFilter>,
    emitter: EventEmitter,
}

impl HotplugSubscriber {
    pub fn new(
        client: DeviceQueryClient,
        filter: Arc<VolumeFilter>,
        emitter: EventEmitter,
    ) -> Self {
        Self {
            client,
            filter,
            emitter,
        }
    }

    /// Route one signal and emit the resulting event, if any.
    ///
    /// Removals are emitted without touching the bus. Additions and changes
    /// are fetched and filtered; a failed fetch or a filtered-out device
    /// emits nothing.
    pub async fn handle_signal(&self, signal: DeviceSignal) -> Option<DeviceEvent> {
        let event = match signal {
            DeviceSignal::Removed(id) => {
                info!("DEVICE REMOVED {id}");
                DeviceEvent::Removed { id }
            }
            DeviceSignal::Added(id) => {
                info!("DEVICE ADDED {id}");
                let props = self.client.properties(&id).await.ok()?;
                let volume = self.filter.filter(&id, &props)?;
                DeviceEvent::Added { id, volume }
            }
            DeviceSignal::Changed(id) => {
                info!("DEVICE CHANGED {id}");
                let props = self.client.properties(&id).await.ok()?;
                let volume = self.filter.filter(&id, &props)?;
                DeviceEvent::Changed { id, volume }
            }
        };

        self.emitter.emit(event.clone());
        Some(event)
    }

    /// Consume `signals` until the stream ends.
    ///
    /// Each addition or change is handled on its own task, so fetches for
    /// different devices may complete out of signal order.
    pub fn spawn(self: Arc<Self>, mut signals: DeviceSignalStream) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(signal) = signals.next().await {
                debug!("Routing {:?}", signal);
                match signal {
                    DeviceSignal::Removed(_) => {
                        self.handle_signal(signal).await;
                    }
                    DeviceSignal::Added(_) | DeviceSignal::Changed(_) => {
                        let subscriber = Arc::clone(&self);
                        tokio::spawn(async move {
                            subscriber.handle_signal(signal).await;
                        });
                    }
                }
            }
            info!("Device signal stream closed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::{FilterPolicy, GroupPolicy};
    use volumes_contracts::VolumeError;
    use volumes_testing::{Call, FakeBackend, FixedStats, fixtures};
    use volumes_types::GroupMembership;

    fn subscriber(
        backend: &FakeBackend,
        groups: &[&str],
    ) -> (Arc<HotplugSubscriber>, EventEmitter) {
        let groups = GroupPolicy::new(GroupMembership::new(groups.iter().copied()), "guests");
        let filter = VolumeFilter::new(
            FilterPolicy::default(),
            groups,
            Arc::new(FixedStats::default()),
        );
        let emitter = EventEmitter::default();
        let subscriber = HotplugSubscriber::new(
            DeviceQueryClient::new(Arc::new(backend.clone())),
            Arc::new(filter),
            emitter.clone(),
        );
        (Arc::new(subscriber), emitter)
    }

    #[tokio::test]
    async fn added_device_is_fetched_filtered_and_emitted() {
        let id = fixtures::device_id("sdb1");
        let backend = FakeBackend::new().with_device(id.clone(), fixtures::usb_stick());
        let (subscriber, emitter) = subscriber(&backend, &[]);
        let mut events = emitter.subscribe();

        let event = subscriber
            .handle_signal(DeviceSignal::Added(id.clone()))
            .await
            .expect("event emitted");

        match &event {
            DeviceEvent::Added { id: event_id, volume } => {
                assert_eq!(event_id, &id);
                assert_eq!(volume.display_name, "Kingston DataTraveler");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(events.try_recv(), Some(event));
        assert_eq!(backend.calls(), vec![Call::GetProperties(id)]);
    }

    #[tokio::test]
    async fn removal_skips_the_bus() {
        let backend = FakeBackend::new();
        let (subscriber, emitter) = subscriber(&backend, &[]);
        let mut events = emitter.subscribe();
        let id = fixtures::device_id("sdb1");

        subscriber
            .handle_signal(DeviceSignal::Removed(id.clone()))
            .await;

        assert_eq!(events.try_recv(), Some(DeviceEvent::Removed { id }));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn change_to_hidden_device_is_silent() {
        let id = fixtures::device_id("sda4");
        let backend =
            FakeBackend::new().with_device(id.clone(), fixtures::internal_partition(None));
        let (subscriber, emitter) = subscriber(&backend, &["guests"]);
        let mut events = emitter.subscribe();

        let event = subscriber.handle_signal(DeviceSignal::Changed(id)).await;

        assert_eq!(event, None);
        assert_eq!(events.try_recv(), None);
    }

    #[tokio::test]
    async fn fetch_failure_is_dropped() {
        let id = fixtures::device_id("sdb1");
        let backend = FakeBackend::new();
        backend.fail_properties(id.clone(), VolumeError::transport("no such object"));
        let (subscriber, emitter) = subscriber(&backend, &[]);
        let mut events = emitter.subscribe();

        let event = subscriber
            .handle_signal(DeviceSignal::Added(id.clone()))
            .await;

        assert_eq!(event, None);
        assert_eq!(events.try_recv(), None);
        assert_eq!(backend.calls(), vec![Call::GetProperties(id)]);
    }

    #[tokio::test]
    async fn spawned_subscriber_routes_stream() {
        let added = fixtures::device_id("sdb1");
        let removed = fixtures::device_id("sdc1");
        let backend = FakeBackend::new().with_device(added.clone(), fixtures::usb_stick());
        let (subscriber, emitter) = subscriber(&backend, &[]);
        let mut events = emitter.subscribe();

        let client = DeviceQueryClient::new(Arc::new(backend.clone()));
        let signals = client.signals().await.unwrap();
        let task = subscriber.spawn(signals);

        backend.send_signal(DeviceSignal::Removed(removed.clone())).await;
        backend.send_signal(DeviceSignal::Changed(added.clone())).await;

        let mut received = vec![events.recv().await.unwrap(), events.recv().await.unwrap()];
        received.sort_by(|a, b| a.name().cmp(b.name()));
        assert_eq!(received[0].name(), "device_changed");
        assert_eq!(received[0].id(), &added);
        assert_eq!(received[1], DeviceEvent::Removed { id: removed });

        backend.close_signals();
        task.await.unwrap();
    }
}
