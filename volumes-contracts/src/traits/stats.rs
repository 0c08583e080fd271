// SPDX-License-Identifier: GPL-3.0-only

use volumes_types::MountUsage;

use crate::VolumeError;

/// Filesystem capacity lookup for a mount point.
pub trait MountStats: Send + Sync {
    fn usage(&self, mount_point: &str) -> Result<MountUsage, VolumeError>;
}
