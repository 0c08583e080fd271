// SPDX-License-Identifier: GPL-3.0-only

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::stream::Stream;
use tokio::sync::mpsc;

use volumes_types::{DeviceId, DeviceProperties, DeviceSignal};

use crate::VolumeError;

/// Primitives the external storage service exposes for each device.
///
/// Every call is non-blocking; results arrive through the returned future.
pub trait StorageBackend: Send + Sync {
    fn enumerate_devices(&self) -> BoxFuture<'_, Result<Vec<DeviceId>, VolumeError>>;

    fn get_properties(&self, id: DeviceId)
    -> BoxFuture<'_, Result<DeviceProperties, VolumeError>>;

    /// Returns the path the filesystem was mounted at.
    fn filesystem_mount(
        &self,
        id: DeviceId,
        filesystem_type: String,
        options: Vec<String>,
    ) -> BoxFuture<'_, Result<String, VolumeError>>;

    fn filesystem_unmount(
        &self,
        id: DeviceId,
        options: Vec<String>,
    ) -> BoxFuture<'_, Result<(), VolumeError>>;

    fn drive_eject(&self, id: DeviceId, options: Vec<String>)
    -> BoxFuture<'_, Result<(), VolumeError>>;

    /// Subscribe to the add/change/remove signals of the service.
    fn device_signals(&self) -> BoxFuture<'_, Result<DeviceSignalStream, VolumeError>>;
}

pub struct DeviceSignalStream {
    receiver: mpsc::Receiver<DeviceSignal>,
}

impl DeviceSignalStream {
    pub fn new(receiver: mpsc::Receiver<DeviceSignal>) -> Self {
        Self { receiver }
    }

    pub fn channel(buffer: usize) -> (mpsc::Sender<DeviceSignal>, Self) {
        let (sender, receiver) = mpsc::channel(buffer);
        (sender, Self::new(receiver))
    }
}

impl Stream for DeviceSignalStream {
    type Item = DeviceSignal;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
