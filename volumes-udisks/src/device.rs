// SPDX-License-Identifier: GPL-3.0-only

//! Per-device property fetch and actions

use std::collections::HashMap;

use zbus::{Connection, zvariant::OwnedValue};
use zbus_macros::proxy;

use volumes_types::{DeviceId, DeviceProperties};

use crate::properties::decode_properties;
use crate::{UDISKS_DEVICE_INTERFACE, UDISKS_SERVICE, UDisksError};

#[proxy(
    default_service = "org.freedesktop.UDisks",
    interface = "org.freedesktop.UDisks.Device"
)]
pub trait UDisksDevice {
    fn filesystem_mount(&self, filesystem_type: &str, options: &[&str]) -> zbus::Result<String>;

    fn filesystem_unmount(&self, options: &[&str]) -> zbus::Result<()>;

    fn drive_eject(&self, options: &[&str]) -> zbus::Result<()>;
}

async fn device_proxy<'a>(
    connection: &Connection,
    id: &'a DeviceId,
) -> Result<UDisksDeviceProxy<'a>, UDisksError> {
    UDisksDeviceProxy::builder(connection)
        .path(id.as_str())?
        .build()
        .await
        .map_err(|e| UDisksError::DBusError(e.to_string()))
}

/// Fetch every `org.freedesktop.UDisks.Device` property of a device.
pub async fn get_properties(
    connection: &Connection,
    id: &DeviceId,
) -> Result<DeviceProperties, UDisksError> {
    let proxy = zbus::Proxy::new(
        connection,
        UDISKS_SERVICE,
        id.as_str(),
        "org.freedesktop.DBus.Properties",
    )
    .await?;

    let raw: HashMap<String, OwnedValue> = proxy.call("GetAll", &(UDISKS_DEVICE_INTERFACE,)).await?;
    decode_properties(raw)
}

/// Mount the filesystem on a device, returning the mount path.
pub async fn filesystem_mount(
    connection: &Connection,
    id: &DeviceId,
    filesystem_type: &str,
    options: &[String],
) -> Result<String, UDisksError> {
    let proxy = device_proxy(connection, id).await?;
    let options: Vec<&str> = options.iter().map(String::as_str).collect();

    proxy
        .filesystem_mount(filesystem_type, &options)
        .await
        .map_err(|e| UDisksError::DBusError(format!("Mount failed: {e}")))
}

pub async fn filesystem_unmount(
    connection: &Connection,
    id: &DeviceId,
    options: &[String],
) -> Result<(), UDisksError> {
    let proxy = device_proxy(connection, id).await?;
    let options: Vec<&str> = options.iter().map(String::as_str).collect();

    proxy
        .filesystem_unmount(&options)
        .await
        .map_err(|e| UDisksError::DBusError(format!("Unmount failed: {e}")))
}

pub async fn drive_eject(
    connection: &Connection,
    id: &DeviceId,
    options: &[String],
) -> Result<(), UDisksError> {
    let proxy = device_proxy(connection, id).await?;
    let options: Vec<&str> = options.iter().map(String::as_str).collect();

    proxy
        .drive_eject(&options)
        .await
        .map_err(|e| UDisksError::DBusError(format!("Eject failed: {e}")))
}
