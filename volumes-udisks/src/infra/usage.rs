// SPDX-License-Identifier: GPL-3.0-only

use std::{ffi::CString, mem::MaybeUninit};

use volumes_contracts::{MountStats, VolumeError};
use volumes_types::MountUsage;

use crate::UDisksError;

pub fn usage_for_mount_point(mount_point: &str) -> Result<MountUsage, UDisksError> {
    let mount_point_c = CString::new(mount_point).map_err(|_| {
        UDisksError::Stats(format!("mount point contains NUL byte: {mount_point:?}"))
    })?;

    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    let rc = unsafe { libc::statvfs(mount_point_c.as_ptr(), stat.as_mut_ptr()) };
    if rc != 0 {
        return Err(UDisksError::Stats(format!(
            "statvfs failed for mount point {mount_point:?}: {}",
            std::io::Error::last_os_error()
        )));
    }

    let stat = unsafe { stat.assume_init() };
    let frsize = if stat.f_frsize > 0 {
        stat.f_frsize
    } else {
        stat.f_bsize
    };

    Ok(MountUsage {
        total_bytes: stat.f_blocks.saturating_mul(frsize),
        free_bytes: stat.f_bavail.saturating_mul(frsize),
    })
}

/// [`MountStats`] backed by `statvfs(3)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsStats;

impl MountStats for StatvfsStats {
    fn usage(&self, mount_point: &str) -> Result<MountUsage, VolumeError> {
        usage_for_mount_point(mount_point).map_err(Into::into)
    }
}
