// SPDX-License-Identifier: GPL-3.0-only

use futures::future::BoxFuture;
use zbus::Connection;

use volumes_contracts::{DeviceSignalStream, StorageBackend, VolumeError};
use volumes_types::{DeviceId, DeviceProperties};

use crate::manager::UDisksDeviceManager;
use crate::{UDisksError, device};

/// [`StorageBackend`] talking to UDisks over the system bus.
#[derive(Clone)]
pub struct UDisksBackend {
    connection: Connection,
}

impl UDisksBackend {
    pub async fn system() -> Result<Self, UDisksError> {
        let connection = Connection::system()
            .await
            .map_err(|e| UDisksError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new(connection))
    }

    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    fn manager(&self) -> UDisksDeviceManager {
        UDisksDeviceManager::with_connection(self.connection.clone())
    }
}

impl StorageBackend for UDisksBackend {
    fn enumerate_devices(&self) -> BoxFuture<'_, Result<Vec<DeviceId>, VolumeError>> {
        Box::pin(async move { Ok(self.manager().enumerate_devices().await?) })
    }

    fn get_properties(
        &self,
        id: DeviceId,
    ) -> BoxFuture<'_, Result<DeviceProperties, VolumeError>> {
        Box::pin(async move { Ok(device::get_properties(&self.connection, &id).await?) })
    }

    fn filesystem_mount(
        &self,
        id: DeviceId,
        filesystem_type: String,
        options: Vec<String>,
    ) -> BoxFuture<'_, Result<String, VolumeError>> {
        Box::pin(async move {
            Ok(device::filesystem_mount(&self.connection, &id, &filesystem_type, &options).await?)
        })
    }

    fn filesystem_unmount(
        &self,
        id: DeviceId,
        options: Vec<String>,
    ) -> BoxFuture<'_, Result<(), VolumeError>> {
        Box::pin(async move {
            Ok(device::filesystem_unmount(&self.connection, &id, &options).await?)
        })
    }

    fn drive_eject(
        &self,
        id: DeviceId,
        options: Vec<String>,
    ) -> BoxFuture<'_, Result<(), VolumeError>> {
        Box::pin(async move { Ok(device::drive_eject(&self.connection, &id, &options).await?) })
    }

    fn device_signals(&self) -> BoxFuture<'_, Result<DeviceSignalStream, VolumeError>> {
        Box::pin(async move { Ok(self.manager().device_signal_stream().await?) })
    }
}
