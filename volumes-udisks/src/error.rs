// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;
use volumes_contracts::VolumeError;

#[derive(Debug, Error)]
pub enum UDisksError {
    #[error("Failed to connect to system bus: {0}")]
    ConnectionFailed(String),

    #[error("D-Bus error: {0}")]
    DBusError(String),

    #[error("Property {key} has an unexpected type: {message}")]
    PropertyType { key: &'static str, message: String },

    #[error("Failed to resolve session groups: {0}")]
    Groups(String),

    #[error("Filesystem statistics unavailable: {0}")]
    Stats(String),
}

impl From<zbus::Error> for UDisksError {
    fn from(err: zbus::Error) -> Self {
        UDisksError::DBusError(err.to_string())
    }
}

impl From<UDisksError> for VolumeError {
    fn from(err: UDisksError) -> Self {
        VolumeError::transport(err.to_string())
    }
}
