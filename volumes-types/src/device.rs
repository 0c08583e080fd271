// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a storage device (the storage service's object path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Snapshot of the properties the storage service reports for one device.
///
/// Field names serialize with the service's own vocabulary (`IdLabel`,
/// `DeviceIsMounted`, ...). Absent fields take their type's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceProperties {
    // Identity
    pub id_label: String,
    pub id_uuid: String,
    pub id_usage: String,
    pub id_type: String,

    // Drive
    pub drive_model: String,
    pub drive_vendor: String,
    pub drive_is_media_ejectable: bool,
    pub drive_can_detach: bool,

    // Partition
    pub partition_size: u64,

    // Mount state
    pub device_is_mounted: bool,
    pub device_mount_paths: Vec<String>,

    // Visibility
    pub device_presentation_hide: bool,
    pub device_is_system_internal: bool,
    pub device_is_media_available: bool,

    // Optical disc
    pub optical_disc_num_audio_tracks: u32,
    pub optical_disc_num_sessions: u32,
    pub optical_disc_num_tracks: u32,
}

impl DeviceProperties {
    /// First reported mount path, if the device is mounted and reports one.
    pub fn mount_path(&self) -> Option<&str> {
        if !self.device_is_mounted {
            return None;
        }
        self.device_mount_paths.first().map(String::as_str)
    }

    pub fn is_filesystem(&self) -> bool {
        self.id_usage == "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_use_service_field_names() {
        let json = r#"{
            "IdLabel": "BACKUP",
            "IdUsage": "filesystem",
            "DeviceIsMounted": true,
            "DeviceMountPaths": ["/media/BACKUP"],
            "OpticalDiscNumAudioTracks": 3
        }"#;

        let props: DeviceProperties = serde_json::from_str(json).unwrap();
        assert_eq!(props.id_label, "BACKUP");
        assert!(props.is_filesystem());
        assert_eq!(props.mount_path(), Some("/media/BACKUP"));
        assert_eq!(props.optical_disc_num_audio_tracks, 3);
        assert_eq!(props.drive_model, "");
        assert!(!props.drive_is_media_ejectable);
    }

    #[test]
    fn mount_path_requires_mounted_flag() {
        let props = DeviceProperties {
            device_is_mounted: false,
            device_mount_paths: vec!["/media/stale".to_string()],
            ..Default::default()
        };
        assert_eq!(props.mount_path(), None);

        let props = DeviceProperties {
            device_is_mounted: true,
            ..Default::default()
        };
        assert_eq!(props.mount_path(), None);
    }

    #[test]
    fn device_id_serializes_as_plain_string() {
        let id = DeviceId::from("/org/freedesktop/UDisks/devices/sdb1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""/org/freedesktop/UDisks/devices/sdb1""#);
        assert_eq!(id.to_string(), "/org/freedesktop/UDisks/devices/sdb1");
    }
}
