// SPDX-License-Identifier: GPL-3.0-only

//! Thin async client over the storage backend
//!
//! Failures are logged here, once, and handed back to the caller unchanged.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use volumes_contracts::{DeviceSignalStream, StorageBackend, VolumeError};
use volumes_types::{DeviceId, DeviceProperties};

#[derive(Clone)]
pub struct DeviceQueryClient {
    backend: Arc<dyn StorageBackend>,
}

impl DeviceQueryClient {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub async fn enumerate(&self) -> Result<Vec<DeviceId>, VolumeError> {
        self.backend
            .enumerate_devices()
            .await
            .inspect_err(|e| warn!("Failed to enumerate devices: {e}"))
    }

    pub async fn properties(&self, id: &DeviceId) -> Result<DeviceProperties, VolumeError> {
        debug!("[{id}] fetching properties");
        self.backend
            .get_properties(id.clone())
            .await
            .inspect_err(|e| warn!("[{id}] {e}"))
    }

    /// Mount using the filesystem type from `props`; returns the mount path.
    pub async fn mount(
        &self,
        id: &DeviceId,
        props: &DeviceProperties,
    ) -> Result<String, VolumeError> {
        self.backend
            .filesystem_mount(id.clone(), props.id_type.clone(), Vec::new())
            .await
            .inspect_err(|e| warn!("[{id}] {e}"))
    }

    pub async fn unmount(&self, id: &DeviceId) -> Result<(), VolumeError> {
        self.backend
            .filesystem_unmount(id.clone(), Vec::new())
            .await
            .inspect_err(|e| warn!("[{id}] {e}"))
    }

    pub async fn eject(&self, id: &DeviceId) -> Result<(), VolumeError> {
        self.backend
            .drive_eject(id.clone(), Vec::new())
            .await
            .inspect_err(|e| warn!("[{id}] {e}"))
    }

    /// Issue a mount without waiting for it; the outcome is only logged.
    pub fn spawn_mount(&self, id: DeviceId, props: &DeviceProperties) -> JoinHandle<()> {
        let client = self.clone();
        let props = props.clone();
        tokio::spawn(async move {
            if let Ok(mount_path) = client.mount(&id, &props).await {
                info!("[AUTO MOUNT] {id} {mount_path}");
            }
        })
    }

    pub async fn signals(&self) -> Result<DeviceSignalStream, VolumeError> {
        self.backend
            .device_signals()
            .await
            .inspect_err(|e| warn!("Failed to subscribe to device signals: {e}"))
    }
}
