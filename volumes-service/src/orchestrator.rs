// SPDX-License-Identifier: GPL-3.0-only

//! Multi-step mount, unmount, eject and listing requests
//!
//! Each request walks [`OperationPhase`]: properties are fetched, the
//! precondition is checked, and only then is the device action invoked.
//! Every request ends in exactly one terminal phase.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use volumes_contracts::{OperationKind, OperationPhase, Precondition, VolumeError};
use volumes_types::{DeviceId, DeviceProperties, Volume};

use crate::client::DeviceQueryClient;
use crate::policies::VolumeFilter;

/// Result of a successful mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountReport {
    #[serde(rename = "udi")]
    pub id: DeviceId,
    /// Snapshot taken before mounting.
    pub properties: DeviceProperties,
    pub mount_path: String,
}

/// Terminal result of one request plus the phases it went through.
#[derive(Debug)]
pub struct OperationOutcome<T> {
    pub result: Result<T, VolumeError>,
    pub phases: Vec<OperationPhase>,
}

impl<T> OperationOutcome<T> {
    pub fn phase(&self) -> OperationPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(OperationPhase::Start)
    }

    pub fn into_result(self) -> Result<T, VolumeError> {
        self.result
    }
}

struct Operation {
    kind: OperationKind,
    target: String,
    phases: Vec<OperationPhase>,
}

impl Operation {
    fn start(kind: OperationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            phases: vec![OperationPhase::Start],
        }
    }

    fn phase(&self) -> OperationPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(OperationPhase::Start)
    }

    fn advance(&mut self, next: OperationPhase) {
        debug_assert!(
            self.phase().can_advance_to(next),
            "illegal {} transition {:?} -> {:?}",
            self.kind,
            self.phase(),
            next
        );
        debug!("[{}] {} {:?} -> {:?}", self.target, self.kind, self.phase(), next);
        self.phases.push(next);
    }

    fn succeed<T>(mut self, value: T) -> OperationOutcome<T> {
        self.advance(OperationPhase::Succeeded);
        OperationOutcome {
            result: Ok(value),
            phases: self.phases,
        }
    }

    fn fail<T>(mut self, error: VolumeError) -> OperationOutcome<T> {
        self.advance(OperationPhase::Failed);
        OperationOutcome {
            result: Err(error),
            phases: self.phases,
        }
    }

    fn violated<T>(mut self, precondition: Precondition) -> OperationOutcome<T> {
        info!("[{}] {} refused: device is {precondition}", self.target, self.kind);
        self.advance(OperationPhase::PreconditionFailed);
        OperationOutcome {
            result: Err(VolumeError::violated(precondition)),
            phases: self.phases,
        }
    }
}

pub struct OperationOrchestrator {
    client: DeviceQueryClient,
    filter: Arc<VolumeFilter>,
    auto_mount: bool,
}

impl OperationOrchestrator {
    pub fn new(client: DeviceQueryClient, filter: Arc<VolumeFilter>, auto_mount: bool) -> Self {
        Self {
            client,
            filter,
            auto_mount,
        }
    }

    pub async fn mount(&self, id: &DeviceId) -> OperationOutcome<MountReport> {
        let mut op = Operation::start(OperationKind::Mount, id.as_str());

        op.advance(OperationPhase::FetchingProperties);
        let props = match self.client.properties(id).await {
            Ok(props) => props,
            Err(e) => return op.fail(e),
        };
        if props.device_is_mounted {
            return op.violated(Precondition::AlreadyMounted);
        }

        op.advance(OperationPhase::Invoking);
        match self.client.mount(id, &props).await {
            Ok(mount_path) => {
                info!("[MOUNT SUCCESS] {id} {mount_path}");
                op.succeed(MountReport {
                    id: id.clone(),
                    properties: props,
                    mount_path,
                })
            }
            Err(e) => op.fail(e),
        }
    }

    pub async fn unmount(&self, id: &DeviceId) -> OperationOutcome<()> {
        let mut op = Operation::start(OperationKind::Unmount, id.as_str());

        op.advance(OperationPhase::FetchingProperties);
        let props = match self.client.properties(id).await {
            Ok(props) => props,
            Err(e) => return op.fail(e),
        };
        if !props.device_is_mounted {
            return op.violated(Precondition::NotMounted);
        }

        op.advance(OperationPhase::Invoking);
        match self.client.unmount(id).await {
            Ok(()) => {
                info!("[UNMOUNT SUCCESS] {id}");
                op.succeed(())
            }
            Err(e) => op.fail(e),
        }
    }

    /// Unmount, then eject if the drive is ejectable.
    ///
    /// A non-ejectable drive fails the request after the unmount has already
    /// happened; the device stays unmounted.
    pub async fn eject(&self, id: &DeviceId) -> OperationOutcome<()> {
        let mut op = Operation::start(OperationKind::Eject, id.as_str());

        op.advance(OperationPhase::FetchingProperties);
        let props = match self.client.properties(id).await {
            Ok(props) => props,
            Err(e) => return op.fail(e),
        };
        if !props.device_is_mounted {
            return op.violated(Precondition::NotMounted);
        }

        op.advance(OperationPhase::Invoking);
        if let Err(e) = self.client.unmount(id).await {
            return op.fail(e);
        }
        info!("[UNMOUNT SUCCESS] {id}");

        if !props.drive_is_media_ejectable {
            info!("[{id}] Drive is not ejectable");
            return op.fail(VolumeError::violated(Precondition::NotEjectable));
        }

        op.advance(OperationPhase::Invoking);
        match self.client.eject(id).await {
            Ok(()) => {
                info!("[EJECT SUCCESS] {id}");
                op.succeed(())
            }
            Err(e) => op.fail(e),
        }
    }

    /// Fetch and filter every enumerated device concurrently.
    ///
    /// All-or-nothing: any failed fetch fails the whole listing once every
    /// fetch has completed. Unmounted filesystems that pass the filter are
    /// mounted in the background when auto-mount is on; the listing does not
    /// wait for those mounts.
    pub async fn list_volumes(&self) -> OperationOutcome<Vec<Volume>> {
        let mut op = Operation::start(OperationKind::List, "*");

        op.advance(OperationPhase::FetchingProperties);
        let ids = match self.client.enumerate().await {
            Ok(ids) => ids,
            Err(e) => return op.fail(e),
        };

        let fetches = ids.into_iter().map(|id| async move {
            let props = self.client.properties(&id).await?;
            let volume = self.filter.filter(&id, &props);
            if self.auto_mount
                && volume.is_some()
                && props.is_filesystem()
                && !props.device_is_mounted
            {
                self.client.spawn_mount(id, &props);
            }
            Ok::<_, VolumeError>(volume)
        });

        let mut volumes = Vec::new();
        let mut failure = None;
        for result in join_all(fetches).await {
            match result {
                Ok(Some(volume)) => volumes.push(volume),
                Ok(None) => {}
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            Some(e) => op.fail(e),
            None => {
                debug!("Listed {} volumes", volumes.len());
                op.succeed(volumes)
            }
        }
    }
}
