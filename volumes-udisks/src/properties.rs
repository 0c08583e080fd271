// SPDX-License-Identifier: GPL-3.0-only

//! Decoding of `org.freedesktop.DBus.Properties.GetAll` replies

use std::collections::HashMap;

use zbus::zvariant::{self, OwnedValue, Value};

use volumes_types::DeviceProperties;

use crate::UDisksError;

fn take<T>(raw: &mut HashMap<String, OwnedValue>, key: &'static str) -> Result<T, UDisksError>
where
    T: Default + TryFrom<Value<'static>>,
    T::Error: Into<zvariant::Error>,
{
    match raw.remove(key) {
        None => Ok(T::default()),
        Some(value) => T::try_from(Value::from(value)).map_err(|e| UDisksError::PropertyType {
            key,
            message: e.into().to_string(),
        }),
    }
}

/// Build a [`DeviceProperties`] snapshot from a raw property bag.
///
/// Absent keys take their default; a key carrying the wrong D-Bus type is an error.
pub fn decode_properties(
    mut raw: HashMap<String, OwnedValue>,
) -> Result<DeviceProperties, UDisksError> {
    Ok(DeviceProperties {
        id_label: take(&mut raw, "IdLabel")?,
        id_uuid: take(&mut raw, "IdUuid")?,
        id_usage: take(&mut raw, "IdUsage")?,
        id_type: take(&mut raw, "IdType")?,
        drive_model: take(&mut raw, "DriveModel")?,
        drive_vendor: take(&mut raw, "DriveVendor")?,
        drive_is_media_ejectable: take(&mut raw, "DriveIsMediaEjectable")?,
        drive_can_detach: take(&mut raw, "DriveCanDetach")?,
        partition_size: take(&mut raw, "PartitionSize")?,
        device_is_mounted: take(&mut raw, "DeviceIsMounted")?,
        device_mount_paths: take(&mut raw, "DeviceMountPaths")?,
        device_presentation_hide: take(&mut raw, "DevicePresentationHide")?,
        device_is_system_internal: take(&mut raw, "DeviceIsSystemInternal")?,
        device_is_media_available: take(&mut raw, "DeviceIsMediaAvailable")?,
        optical_disc_num_audio_tracks: take(&mut raw, "OpticalDiscNumAudioTracks")?,
        optical_disc_num_sessions: take(&mut raw, "OpticalDiscNumSessions")?,
        optical_disc_num_tracks: take(&mut raw, "OpticalDiscNumTracks")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned<'a>(value: impl Into<Value<'a>>) -> OwnedValue {
        value.into().try_to_owned().unwrap()
    }

    #[test]
    fn decodes_typed_fields() {
        let mut raw = HashMap::new();
        raw.insert("IdLabel".to_string(), owned("BACKUP"));
        raw.insert("IdUsage".to_string(), owned("filesystem"));
        raw.insert("DriveIsMediaEjectable".to_string(), owned(true));
        raw.insert("PartitionSize".to_string(), owned(16_000_000_000u64));
        raw.insert("DeviceIsMounted".to_string(), owned(true));
        raw.insert(
            "DeviceMountPaths".to_string(),
            owned(vec!["/media/BACKUP".to_string()]),
        );
        raw.insert("OpticalDiscNumTracks".to_string(), owned(2u32));
        raw.insert("DeviceFile".to_string(), owned("/dev/sdb1"));

        let props = decode_properties(raw).unwrap();
        assert_eq!(props.id_label, "BACKUP");
        assert_eq!(props.id_usage, "filesystem");
        assert!(props.drive_is_media_ejectable);
        assert_eq!(props.partition_size, 16_000_000_000);
        assert_eq!(props.device_mount_paths, vec!["/media/BACKUP".to_string()]);
        assert_eq!(props.optical_disc_num_tracks, 2);
        assert_eq!(props.drive_vendor, "");
    }

    #[test]
    fn wrong_type_names_the_key() {
        let mut raw = HashMap::new();
        raw.insert("DeviceIsMounted".to_string(), owned("yes"));

        let err = decode_properties(raw).unwrap_err();
        match err {
            UDisksError::PropertyType { key, .. } => assert_eq!(key, "DeviceIsMounted"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
