// SPDX-License-Identifier: GPL-3.0-only

use futures::StreamExt;
use tracing::warn;
use zbus::{Connection, zvariant::OwnedObjectPath};
use zbus_macros::proxy;

use volumes_contracts::DeviceSignalStream;
use volumes_types::{DeviceId, DeviceSignal};

use crate::UDisksError;

#[proxy(
    default_service = "org.freedesktop.UDisks",
    default_path = "/org/freedesktop/UDisks",
    interface = "org.freedesktop.UDisks"
)]
pub trait UDisks {
    fn enumerate_devices(&self) -> zbus::Result<Vec<OwnedObjectPath>>;

    #[zbus(signal)]
    fn device_added(&self, device: OwnedObjectPath) -> zbus::Result<()>;

    #[zbus(signal)]
    fn device_changed(&self, device: OwnedObjectPath) -> zbus::Result<()>;

    #[zbus(signal)]
    fn device_removed(&self, device: OwnedObjectPath) -> zbus::Result<()>;
}

pub struct UDisksDeviceManager {
    connection: Connection,
}

impl UDisksDeviceManager {
    pub fn with_connection(connection: Connection) -> Self {
        Self { connection }
    }

    pub async fn enumerate_devices(&self) -> Result<Vec<DeviceId>, UDisksError> {
        let proxy = UDisksProxy::new(&self.connection).await?;
        let paths = proxy.enumerate_devices().await?;
        Ok(paths.iter().map(device_id).collect())
    }

    /// A signal-based event stream for device add/change/remove.
    ///
    /// The forwarding task ends when the bus closes a signal stream or the
    /// receiving side is dropped.
    pub async fn device_signal_stream(&self) -> Result<DeviceSignalStream, UDisksError> {
        let (sender, stream) = DeviceSignalStream::channel(32);

        let proxy = UDisksProxy::new(&self.connection).await?;
        let mut added_stream = proxy.receive_device_added().await?;
        let mut changed_stream = proxy.receive_device_changed().await?;
        let mut removed_stream = proxy.receive_device_removed().await?;

        tokio::spawn(async move {
            loop {
                let signal = tokio::select! {
                    maybe_added = added_stream.next() => {
                        let Some(signal) = maybe_added else {
                            break;
                        };
                        match signal.args() {
                            Ok(args) => DeviceSignal::Added(device_id(&args.device)),
                            Err(e) => {
                                warn!("Failed to parse DeviceAdded signal args: {e}");
                                continue;
                            }
                        }
                    }
                    maybe_changed = changed_stream.next() => {
                        let Some(signal) = maybe_changed else {
                            break;
                        };
                        match signal.args() {
                            Ok(args) => DeviceSignal::Changed(device_id(&args.device)),
                            Err(e) => {
                                warn!("Failed to parse DeviceChanged signal args: {e}");
                                continue;
                            }
                        }
                    }
                    maybe_removed = removed_stream.next() => {
                        let Some(signal) = maybe_removed else {
                            break;
                        };
                        match signal.args() {
                            Ok(args) => DeviceSignal::Removed(device_id(&args.device)),
                            Err(e) => {
                                warn!("Failed to parse DeviceRemoved signal args: {e}");
                                continue;
                            }
                        }
                    }
                };

                if let Err(e) = sender.send(signal).await {
                    warn!("Device signal receiver dropped: {e}");
                    break;
                }
            }
        });

        Ok(stream)
    }
}

fn device_id(path: &OwnedObjectPath) -> DeviceId {
    DeviceId::from(path.to_string())
}
