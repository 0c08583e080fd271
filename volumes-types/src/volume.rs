// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

use crate::device::{DeviceId, DeviceProperties};

/// Normalized, policy-filtered view of a storage device.
///
/// `mount_point` is set iff the device reported itself mounted, and
/// `free_size` is set iff `mount_point` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub id: DeviceId,
    pub display_name: String,
    pub model: String,
    pub vendor: String,
    pub is_disc: bool,
    pub mount_point: Option<String>,
    pub total_size: u64,
    pub free_size: Option<u64>,
    pub raw: RawVolumeFields,
}

/// Selected device fields re-exported in the storage service's vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawVolumeFields {
    pub id_label: String,
    pub id_uuid: String,
    pub id_type: String,
    pub drive_model: String,
    pub drive_vendor: String,
    pub display_name: String,
    pub partition_size: u64,
    pub optical_disc_num_audio_tracks: u32,
    pub optical_disc_num_sessions: u32,
    pub optical_disc_num_tracks: u32,
    pub drive_is_media_ejectable: bool,
    pub drive_can_detach: bool,
    pub device_is_media_available: bool,
    pub device_is_mounted: bool,
    pub device_mount_paths: Vec<String>,
    pub device_is_system_internal: bool,
}

impl RawVolumeFields {
    pub fn from_properties(props: &DeviceProperties, display_name: &str) -> Self {
        Self {
            id_label: props.id_label.clone(),
            id_uuid: props.id_uuid.clone(),
            id_type: props.id_type.clone(),
            drive_model: props.drive_model.clone(),
            drive_vendor: props.drive_vendor.clone(),
            display_name: display_name.to_string(),
            partition_size: props.partition_size,
            optical_disc_num_audio_tracks: props.optical_disc_num_audio_tracks,
            optical_disc_num_sessions: props.optical_disc_num_sessions,
            optical_disc_num_tracks: props.optical_disc_num_tracks,
            drive_is_media_ejectable: props.drive_is_media_ejectable,
            drive_can_detach: props.drive_can_detach,
            device_is_media_available: props.device_is_media_available,
            device_is_mounted: props.device_is_mounted,
            device_mount_paths: props.device_mount_paths.clone(),
            device_is_system_internal: props.device_is_system_internal,
        }
    }
}

/// JSON shape handed to hosts: legacy `volume.*` keys followed by the raw fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumePayload {
    #[serde(rename = "volume.label")]
    pub label: String,
    #[serde(rename = "volume.model")]
    pub model: String,
    #[serde(rename = "volume.is_disc")]
    pub is_disc: bool,
    #[serde(rename = "volume.mount_point")]
    pub mount_point: Option<String>,
    #[serde(rename = "volume.size")]
    pub size: u64,
    #[serde(rename = "volume.size_free")]
    pub size_free: Option<u64>,
    #[serde(flatten)]
    pub raw: RawVolumeFields,
}

impl From<&Volume> for VolumePayload {
    fn from(volume: &Volume) -> Self {
        Self {
            label: volume.display_name.clone(),
            model: volume.model.clone(),
            is_disc: volume.is_disc,
            mount_point: volume.mount_point.clone(),
            size: volume.total_size,
            size_free: volume.free_size,
            raw: volume.raw.clone(),
        }
    }
}
