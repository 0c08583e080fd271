// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use volumes_contracts::{MountStats, VolumeError, VolumeErrorKind};
use volumes_types::MountUsage;

/// [`MountStats`] answering from a fixed table; unknown mount points fail.
#[derive(Debug, Clone, Default)]
pub struct FixedStats {
    usage: HashMap<String, MountUsage>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl FixedStats {
    pub fn with_mount(mut self, mount_point: &str, usage: MountUsage) -> Self {
        self.usage.insert(mount_point.to_string(), usage);
        self
    }

    /// Mount points queried so far, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl MountStats for FixedStats {
    fn usage(&self, mount_point: &str) -> Result<MountUsage, VolumeError> {
        self.lookups.lock().unwrap().push(mount_point.to_string());
        self.usage
            .get(mount_point)
            .copied()
            .ok_or_else(|| {
                VolumeError::new(
                    VolumeErrorKind::Unavailable,
                    format!("no statistics for {mount_point}"),
                )
            })
    }
}
