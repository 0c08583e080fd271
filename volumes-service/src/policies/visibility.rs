// SPDX-License-Identifier: GPL-3.0-only

//! Projection of device property snapshots into user-facing volumes.
//!
//! The rules run in a fixed order:
//!
//! 1. internal partitions are suppressed for restricted sessions (root excepted)
//! 2. only visible filesystems and ejectable media pass
//! 3. unlabeled removable drives are seeded with their model name
//! 4. mounted devices get a mount point and free space
//! 5. the display label is resolved (root and host mounts have fixed names)
//! 6. the live-session overlay is reported as the real root

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use volumes_contracts::MountStats;
use volumes_types::{DeviceId, DeviceProperties, RawVolumeFields, Volume};

use super::GroupPolicy;

/// Names and paths the filter treats specially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPolicy {
    /// Sessions in this group do not see internal partitions.
    pub restricted_group: String,
    /// Label of the volume mounted at `/`.
    pub root_label: String,
    pub host_mount_point: String,
    /// Label of the volume mounted at `host_mount_point`.
    pub host_label: String,
    /// Read-only overlay root of live sessions, reported as `/`.
    pub live_overlay_mount_point: String,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            restricted_group: "guests".to_string(),
            root_label: "Jolicloud".to_string(),
            host_mount_point: "/host".to_string(),
            host_label: "Windows".to_string(),
            live_overlay_mount_point: "/rofs".to_string(),
        }
    }
}

pub struct VolumeFilter {
    policy: FilterPolicy,
    groups: GroupPolicy,
    stats: Arc<dyn MountStats>,
}

impl VolumeFilter {
    pub fn new(policy: FilterPolicy, groups: GroupPolicy, stats: Arc<dyn MountStats>) -> Self {
        Self {
            policy,
            groups,
            stats,
        }
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    pub fn groups(&self) -> &GroupPolicy {
        &self.groups
    }

    /// Returns `None` when the device should not be shown. That is a normal
    /// outcome, not an error.
    pub fn filter(&self, id: &DeviceId, props: &DeviceProperties) -> Option<Volume> {
        if self.groups.hides_internal(props) {
            trace!("[{id}] internal partition hidden from restricted session");
            return None;
        }

        if !is_visible(props) {
            trace!("[{id}] not a visible filesystem or ejectable medium");
            return None;
        }

        let seeded = seed_label(props);

        let mount_point = props.mount_path().map(str::to_string);
        let free_size = mount_point.as_deref().map(|path| self.free_bytes(id, path));

        let display_name = self.resolve_label(mount_point.as_deref(), props);
        if let Some(seed) = seeded
            && seed != display_name
        {
            trace!("[{id}] seeded label {seed:?} superseded by {display_name:?}");
        }

        let mut raw = RawVolumeFields::from_properties(props, &display_name);
        let mount_point = match mount_point {
            Some(path) if path == self.policy.live_overlay_mount_point => {
                raw.device_mount_paths = vec!["/".to_string()];
                Some("/".to_string())
            }
            other => other,
        };

        Some(Volume {
            id: id.clone(),
            display_name,
            model: props.drive_model.clone(),
            vendor: props.drive_vendor.clone(),
            is_disc: props.drive_is_media_ejectable,
            mount_point,
            total_size: props.partition_size,
            free_size,
            raw,
        })
    }

    fn free_bytes(&self, id: &DeviceId, mount_point: &str) -> u64 {
        match self.stats.usage(mount_point) {
            Ok(usage) => usage.free_bytes,
            Err(e) => {
                warn!("[{id}] no usage for {mount_point}: {e}");
                0
            }
        }
    }

    fn resolve_label(&self, mount_point: Option<&str>, props: &DeviceProperties) -> String {
        let label = match mount_point {
            Some("/") => self.policy.root_label.clone(),
            Some(path) if path == self.policy.host_mount_point => self.policy.host_label.clone(),
            _ if !props.id_label.is_empty() => props.id_label.clone(),
            _ => format!("{} {}", props.drive_vendor, props.drive_model),
        };
        label.trim().to_string()
    }
}

fn is_visible(props: &DeviceProperties) -> bool {
    (props.is_filesystem() && !props.device_presentation_hide) || props.drive_is_media_ejectable
}

fn seed_label(props: &DeviceProperties) -> Option<&str> {
    if props.id_label.is_empty() && (props.drive_is_media_ejectable || props.drive_can_detach) {
        Some(props.drive_model.as_str())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volumes_testing::{FixedStats, fixtures};
    use volumes_types::{GroupMembership, MountUsage};

    fn filter_for(groups: &[&str], stats: FixedStats) -> VolumeFilter {
        let policy = FilterPolicy::default();
        let groups = GroupPolicy::new(
            GroupMembership::new(groups.iter().copied()),
            policy.restricted_group.clone(),
        );
        VolumeFilter::new(policy, groups, Arc::new(stats))
    }

    fn usage(free_bytes: u64) -> MountUsage {
        MountUsage {
            total_bytes: 100 * 1024 * 1024 * 1024,
            free_bytes,
        }
    }

    #[test]
    fn non_filesystem_non_ejectable_is_dropped() {
        let filter = filter_for(&[], FixedStats::default());
        let props = DeviceProperties {
            id_usage: "raid".to_string(),
            drive_is_media_ejectable: false,
            ..Default::default()
        };
        assert_eq!(filter.filter(&fixtures::device_id("md0"), &props), None);

        let props = DeviceProperties {
            id_usage: String::new(),
            ..Default::default()
        };
        assert_eq!(filter.filter(&fixtures::device_id("sda"), &props), None);
    }

    #[test]
    fn hidden_filesystem_is_dropped_unless_ejectable() {
        let filter = filter_for(&[], FixedStats::default());
        let mut props = DeviceProperties {
            id_usage: "filesystem".to_string(),
            device_presentation_hide: true,
            ..Default::default()
        };
        assert_eq!(filter.filter(&fixtures::device_id("sda2"), &props), None);

        props.drive_is_media_ejectable = true;
        assert!(filter.filter(&fixtures::device_id("sda2"), &props).is_some());
    }

    #[test]
    fn unlabeled_usb_stick_uses_vendor_and_model() {
        let filter = filter_for(&[], FixedStats::default());
        let id = fixtures::device_id("sdb1");

        let volume = filter.filter(&id, &fixtures::usb_stick()).unwrap();
        assert_eq!(volume.id, id);
        assert_eq!(volume.display_name, "Kingston DataTraveler");
        assert_eq!(volume.raw.display_name, "Kingston DataTraveler");
        assert_eq!(volume.mount_point, None);
        assert_eq!(volume.free_size, None);
        assert!(volume.is_disc);
        assert_eq!(volume.total_size, fixtures::usb_stick().partition_size);
    }

    #[test]
    fn ejectable_media_pass_without_a_filesystem() {
        let filter = filter_for(&[], FixedStats::default());
        let props = fixtures::audio_cd();
        assert!(!props.is_filesystem());

        let volume = filter.filter(&fixtures::device_id("sr0"), &props).unwrap();
        assert_eq!(volume.display_name, "PIONEER DVD-RW DVR-K17");
        assert!(volume.is_disc);
        assert_eq!(volume.mount_point, None);
        assert_eq!(volume.raw.optical_disc_num_audio_tracks, 12);
    }

    #[test]
    fn id_label_wins_over_vendor_and_model() {
        let filter = filter_for(&[], FixedStats::default());
        let mut props = fixtures::usb_stick();
        props.id_label = "  PHOTOS ".to_string();

        let volume = filter.filter(&fixtures::device_id("sdb1"), &props).unwrap();
        assert_eq!(volume.display_name, "PHOTOS");
        assert_eq!(volume.raw.id_label, "  PHOTOS ");
    }

    #[test]
    fn mounted_volume_reports_mount_point_and_free_space() {
        let stats = FixedStats::default().with_mount("/media/PHOTOS", usage(1234));
        let filter = filter_for(&[], stats.clone());

        let props = fixtures::mounted_usb_stick("/media/PHOTOS");
        let volume = filter.filter(&fixtures::device_id("sdb1"), &props).unwrap();
        assert_eq!(volume.mount_point.as_deref(), Some("/media/PHOTOS"));
        assert_eq!(volume.free_size, Some(1234));
        assert_eq!(stats.lookups(), vec!["/media/PHOTOS".to_string()]);
    }

    #[test]
    fn failed_stats_still_report_free_size() {
        let filter = filter_for(&[], FixedStats::default());

        let props = fixtures::mounted_usb_stick("/media/GONE");
        let volume = filter.filter(&fixtures::device_id("sdb1"), &props).unwrap();
        assert_eq!(volume.mount_point.as_deref(), Some("/media/GONE"));
        assert_eq!(volume.free_size, Some(0));
    }

    #[test]
    fn root_is_always_jolicloud() {
        let stats = FixedStats::default().with_mount("/", usage(10));
        let filter = filter_for(&[], stats);

        let mut props = fixtures::root_filesystem();
        props.id_label = "ubuntu-root".to_string();

        let volume = filter.filter(&fixtures::device_id("sda1"), &props).unwrap();
        assert_eq!(volume.display_name, "Jolicloud");
        assert_eq!(volume.mount_point.as_deref(), Some("/"));
    }

    #[test]
    fn host_partition_is_windows() {
        let stats = FixedStats::default().with_mount("/host", usage(10));
        let filter = filter_for(&[], stats);

        let mut props = fixtures::internal_partition(Some("/host"));
        props.id_label = "OS".to_string();

        let volume = filter.filter(&fixtures::device_id("sda3"), &props).unwrap();
        assert_eq!(volume.display_name, "Windows");
    }

    #[test]
    fn live_overlay_is_reported_as_root() {
        let stats = FixedStats::default().with_mount("/rofs", usage(42));
        let filter = filter_for(&[], stats.clone());

        let volume = filter
            .filter(&fixtures::device_id("loop0"), &fixtures::live_overlay())
            .unwrap();
        assert_eq!(volume.mount_point.as_deref(), Some("/"));
        assert_eq!(volume.raw.device_mount_paths, vec!["/".to_string()]);
        assert_eq!(volume.free_size, Some(42));
        assert_eq!(stats.lookups(), vec!["/rofs".to_string()]);
        // The label is resolved before the rewrite.
        assert_ne!(volume.display_name, "Jolicloud");
    }

    #[test]
    fn guests_do_not_see_unmounted_internal_partitions() {
        let filter = filter_for(&["guests"], FixedStats::default());

        let mut props = fixtures::internal_partition(None);
        props.drive_is_media_ejectable = true;
        props.id_label = "DATA".to_string();
        assert_eq!(filter.filter(&fixtures::device_id("sda4"), &props), None);

        let props = fixtures::internal_partition(Some("/home"));
        assert_eq!(filter.filter(&fixtures::device_id("sda5"), &props), None);
    }

    #[test]
    fn guests_see_the_root_filesystem() {
        let stats = FixedStats::default().with_mount("/", usage(10));
        let filter = filter_for(&["guests"], stats);

        let volume = filter
            .filter(&fixtures::device_id("sda1"), &fixtures::root_filesystem())
            .unwrap();
        assert_eq!(volume.display_name, "Jolicloud");
    }

    #[test]
    fn empty_vendor_and_model_give_empty_label() {
        let filter = filter_for(&[], FixedStats::default());
        let props = DeviceProperties {
            id_usage: "filesystem".to_string(),
            ..Default::default()
        };

        let volume = filter.filter(&fixtures::device_id("sdc1"), &props).unwrap();
        assert_eq!(volume.display_name, "");
    }

    #[test]
    fn filtering_is_repeatable() {
        let stats = FixedStats::default().with_mount("/media/PHOTOS", usage(99));
        let filter = filter_for(&[], stats);
        let id = fixtures::device_id("sdb1");
        let props = fixtures::mounted_usb_stick("/media/PHOTOS");

        assert_eq!(filter.filter(&id, &props), filter.filter(&id, &props));
    }

    #[test]
    fn custom_policy_labels_apply() {
        let policy = FilterPolicy {
            root_label: "System".to_string(),
            ..Default::default()
        };
        let groups = GroupPolicy::new(GroupMembership::default(), "guests");
        let stats = FixedStats::default().with_mount("/", usage(1));
        let filter = VolumeFilter::new(policy, groups, Arc::new(stats));

        let volume = filter
            .filter(&fixtures::device_id("sda1"), &fixtures::root_filesystem())
            .unwrap();
        assert_eq!(volume.display_name, "System");
    }
}
