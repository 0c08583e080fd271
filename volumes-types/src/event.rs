// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

use crate::device::DeviceId;
use crate::volume::{Volume, VolumePayload};

/// Raw hotplug notification from the storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSignal {
    Added(DeviceId),
    Changed(DeviceId),
    Removed(DeviceId),
}

impl DeviceSignal {
    pub fn id(&self) -> &DeviceId {
        match self {
            Self::Added(id) | Self::Changed(id) | Self::Removed(id) => id,
        }
    }
}

/// Normalized device event delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    Added { id: DeviceId, volume: Volume },
    Changed { id: DeviceId, volume: Volume },
    Removed { id: DeviceId },
}

impl DeviceEvent {
    pub const ADDED: &'static str = "device_added";
    pub const CHANGED: &'static str = "device_changed";
    pub const REMOVED: &'static str = "device_removed";

    /// Event name as registered with the host.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Added { .. } => Self::ADDED,
            Self::Changed { .. } => Self::CHANGED,
            Self::Removed { .. } => Self::REMOVED,
        }
    }

    pub fn id(&self) -> &DeviceId {
        match self {
            Self::Added { id, .. } | Self::Changed { id, .. } | Self::Removed { id } => id,
        }
    }

    pub fn payload(&self) -> DevicePayload {
        match self {
            Self::Added { id, volume } | Self::Changed { id, volume } => {
                DevicePayload::with_volume(id.clone(), volume)
            }
            Self::Removed { id } => DevicePayload {
                udi: id.clone(),
                properties: None,
            },
        }
    }
}

/// `{ "udi": ..., "properties": ... }` body used for events and listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePayload {
    pub udi: DeviceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<VolumePayload>,
}

impl DevicePayload {
    pub fn with_volume(udi: DeviceId, volume: &Volume) -> Self {
        Self {
            udi,
            properties: Some(VolumePayload::from(volume)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_payload_only_carries_udi() {
        let event = DeviceEvent::Removed {
            id: DeviceId::from("/org/freedesktop/UDisks/devices/sdc"),
        };

        assert_eq!(event.name(), "device_removed");
        let json = serde_json::to_value(event.payload()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "udi": "/org/freedesktop/UDisks/devices/sdc" })
        );
    }

    #[test]
    fn signal_exposes_device_id() {
        let id = DeviceId::from("/org/freedesktop/UDisks/devices/sr0");
        assert_eq!(DeviceSignal::Changed(id.clone()).id(), &id);
    }
}
