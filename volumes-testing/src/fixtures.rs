// SPDX-License-Identifier: GPL-3.0-only

//! Property snapshots for common device kinds

use volumes_types::{DeviceId, DeviceProperties};

pub fn device_id(name: &str) -> DeviceId {
    DeviceId::new(format!("/org/freedesktop/UDisks/devices/{name}"))
}

/// Unlabeled, unmounted Kingston USB stick.
pub fn usb_stick() -> DeviceProperties {
    DeviceProperties {
        id_label: String::new(),
        id_uuid: "6A1B-2C3D".to_string(),
        id_usage: "filesystem".to_string(),
        id_type: "vfat".to_string(),
        drive_model: "DataTraveler".to_string(),
        drive_vendor: "Kingston".to_string(),
        drive_is_media_ejectable: true,
        drive_can_detach: true,
        partition_size: 8_004_304_896,
        device_is_mounted: false,
        device_mount_paths: Vec::new(),
        device_presentation_hide: false,
        device_is_system_internal: false,
        device_is_media_available: true,
        ..Default::default()
    }
}

pub fn mounted_usb_stick(mount_point: &str) -> DeviceProperties {
    DeviceProperties {
        device_is_mounted: true,
        device_mount_paths: vec![mount_point.to_string()],
        ..usb_stick()
    }
}

/// Fixed-disk data partition, optionally mounted.
pub fn internal_partition(mount_point: Option<&str>) -> DeviceProperties {
    DeviceProperties {
        id_uuid: "0f3c1a52-8d3e-4a44-9d7b-5b0e2b1c9a10".to_string(),
        id_usage: "filesystem".to_string(),
        id_type: "ext4".to_string(),
        drive_model: "ST500DM002".to_string(),
        drive_vendor: "ATA".to_string(),
        partition_size: 250_059_350_016,
        device_is_mounted: mount_point.is_some(),
        device_mount_paths: mount_point.map(|p| vec![p.to_string()]).unwrap_or_default(),
        device_is_system_internal: true,
        device_is_media_available: true,
        ..Default::default()
    }
}

pub fn root_filesystem() -> DeviceProperties {
    internal_partition(Some("/"))
}

/// Squashfs overlay of a live session, mounted at `/rofs`.
pub fn live_overlay() -> DeviceProperties {
    DeviceProperties {
        id_usage: "filesystem".to_string(),
        id_type: "squashfs".to_string(),
        partition_size: 0,
        device_is_mounted: true,
        device_mount_paths: vec!["/rofs".to_string()],
        device_is_system_internal: true,
        device_is_media_available: true,
        ..Default::default()
    }
}

/// Member of a software RAID array; never shown.
pub fn raid_member() -> DeviceProperties {
    DeviceProperties {
        id_usage: "raid".to_string(),
        id_type: "linux_raid_member".to_string(),
        drive_model: "ST500DM002".to_string(),
        drive_vendor: "ATA".to_string(),
        partition_size: 500_107_862_016,
        device_is_system_internal: true,
        ..Default::default()
    }
}

/// Audio CD in an optical drive.
pub fn audio_cd() -> DeviceProperties {
    DeviceProperties {
        drive_model: "DVD-RW DVR-K17".to_string(),
        drive_vendor: "PIONEER".to_string(),
        drive_is_media_ejectable: true,
        device_is_media_available: true,
        optical_disc_num_audio_tracks: 12,
        optical_disc_num_sessions: 1,
        optical_disc_num_tracks: 12,
        ..Default::default()
    }
}
