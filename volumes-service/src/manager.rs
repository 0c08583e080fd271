// SPDX-License-Identifier: GPL-3.0-only

//! Volume manager façade
//!
//! Owns the filter, hotplug subscriber and orchestrator, wired to injected
//! collaborators, and reports request outcomes through a [`RequestHandler`].

use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use volumes_contracts::{
    MountStats, OperationKind, RequestHandler, RequestId, StorageBackend, VolumeError,
};
use volumes_types::{DeviceId, DevicePayload, GroupMembership, Volume};

use crate::client::DeviceQueryClient;
use crate::config::ServiceConfig;
use crate::events::{DeviceEventStream, EventEmitter};
use crate::hotplug::HotplugSubscriber;
use crate::orchestrator::{MountReport, OperationOrchestrator, OperationOutcome};
use crate::policies::{GroupPolicy, VolumeFilter};

/// A request a host can make of the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeRequest {
    List,
    Mount(DeviceId),
    Unmount(DeviceId),
    Eject(DeviceId),
}

impl VolumeRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::List => OperationKind::List,
            Self::Mount(_) => OperationKind::Mount,
            Self::Unmount(_) => OperationKind::Unmount,
            Self::Eject(_) => OperationKind::Eject,
        }
    }
}

pub struct VolumeManager {
    client: DeviceQueryClient,
    filter: Arc<VolumeFilter>,
    orchestrator: OperationOrchestrator,
    emitter: EventEmitter,
}

impl VolumeManager {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        stats: Arc<dyn MountStats>,
        groups: GroupMembership,
        config: &ServiceConfig,
    ) -> Self {
        let client = DeviceQueryClient::new(backend);
        let group_policy = GroupPolicy::new(groups, config.policy.restricted_group.clone());
        if group_policy.is_restricted() {
            info!("Restricted session: internal partitions are hidden");
        }

        let filter = Arc::new(VolumeFilter::new(
            config.policy.clone(),
            group_policy,
            stats,
        ));
        let orchestrator = OperationOrchestrator::new(
            client.clone(),
            Arc::clone(&filter),
            config.listing.auto_mount,
        );

        Self {
            client,
            filter,
            orchestrator,
            emitter: EventEmitter::default(),
        }
    }

    /// Receive `device_added`, `device_changed` and `device_removed` events.
    pub fn subscribe(&self) -> DeviceEventStream {
        self.emitter.subscribe()
    }

    /// Subscribe to the backend's hotplug signals and start translating them.
    pub async fn start_hotplug(&self) -> Result<JoinHandle<()>, VolumeError> {
        let signals = self.client.signals().await?;
        let subscriber = HotplugSubscriber::new(
            self.client.clone(),
            Arc::clone(&self.filter),
            self.emitter.clone(),
        );
        info!("Device hotplug monitoring started");
        Ok(Arc::new(subscriber).spawn(signals))
    }

    pub async fn list_volumes(&self) -> Result<Vec<Volume>, VolumeError> {
        self.orchestrator.list_volumes().await.into_result()
    }

    pub async fn mount(&self, id: &DeviceId) -> Result<MountReport, VolumeError> {
        self.orchestrator.mount(id).await.into_result()
    }

    pub async fn unmount(&self, id: &DeviceId) -> Result<(), VolumeError> {
        self.orchestrator.unmount(id).await.into_result()
    }

    pub async fn eject(&self, id: &DeviceId) -> Result<(), VolumeError> {
        self.orchestrator.eject(id).await.into_result()
    }

    /// Run a request and report it to `handler`: optional data, then exactly
    /// one of `success` or `failed`.
    pub async fn handle(
        &self,
        request: RequestId,
        command: VolumeRequest,
        handler: &dyn RequestHandler,
    ) {
        debug!("Request {request}: {command:?}");

        let outcome = match &command {
            VolumeRequest::List => with_data(self.orchestrator.list_volumes().await, |volumes| {
                let entries: Vec<DevicePayload> = volumes
                    .iter()
                    .map(|volume| DevicePayload::with_volume(volume.id.clone(), volume))
                    .collect();
                json!(entries)
            }),
            VolumeRequest::Mount(id) => {
                with_data(self.orchestrator.mount(id).await, |report| json!(report))
            }
            VolumeRequest::Unmount(id) => without_data(self.orchestrator.unmount(id).await),
            VolumeRequest::Eject(id) => without_data(self.orchestrator.eject(id).await),
        };

        match outcome {
            Ok(payload) => {
                if let Some(payload) = payload {
                    handler.send_data(request, payload).await;
                }
                handler.success(request).await;
            }
            Err(error) => {
                debug!("Request {request} ({}) failed: {error}", command.kind());
                handler.failed(request, error).await;
            }
        }
    }
}

fn with_data<T>(
    outcome: OperationOutcome<T>,
    payload: impl FnOnce(&T) -> serde_json::Value,
) -> Result<Option<serde_json::Value>, VolumeError> {
    outcome.into_result().map(|value| Some(payload(&value)))
}

fn without_data(outcome: OperationOutcome<()>) -> Result<Option<serde_json::Value>, VolumeError> {
    outcome.into_result().map(|()| None)
}
