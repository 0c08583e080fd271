// SPDX-License-Identifier: GPL-3.0-only

use nix::unistd::{Group, getgroups};
use volumes_types::GroupMembership;

use crate::UDisksError;

/// Names of the supplementary groups of the current process.
///
/// Group ids without a database entry are skipped.
pub fn current_user_groups() -> Result<GroupMembership, UDisksError> {
    let gids = getgroups().map_err(|e| UDisksError::Groups(e.to_string()))?;

    let names = gids
        .into_iter()
        .filter_map(|gid| match Group::from_gid(gid) {
            Ok(Some(group)) => Some(group.name),
            Ok(None) => {
                tracing::debug!("No group entry for gid {}", gid);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to look up gid {}: {}", gid, e);
                None
            }
        })
        .collect();

    Ok(names)
}
