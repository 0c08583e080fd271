// SPDX-License-Identifier: GPL-3.0-only

use volumes_types::{DeviceProperties, GroupMembership};

/// Access policy derived from the session's group membership.
#[derive(Debug, Clone)]
pub struct GroupPolicy {
    membership: GroupMembership,
    restricted_group: String,
}

impl GroupPolicy {
    pub fn new(membership: GroupMembership, restricted_group: impl Into<String>) -> Self {
        Self {
            membership,
            restricted_group: restricted_group.into(),
        }
    }

    pub fn membership(&self) -> &GroupMembership {
        &self.membership
    }

    /// Whether the session belongs to the restricted (guest) group.
    pub fn is_restricted(&self) -> bool {
        self.membership.contains(&self.restricted_group)
    }

    /// Internal partitions are hidden from restricted sessions, except the
    /// root filesystem.
    pub fn hides_internal(&self, props: &DeviceProperties) -> bool {
        self.is_restricted() && props.device_is_system_internal && props.mount_path() != Some("/")
    }
}
