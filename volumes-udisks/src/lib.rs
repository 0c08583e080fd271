// SPDX-License-Identifier: GPL-3.0-only

//! Binding of the volume manager's collaborator contracts to the UDisks
//! service on the system bus.

mod infra;

pub mod backend;
pub mod device;
pub mod error;
pub mod manager;
pub mod properties;

pub use backend::UDisksBackend;
pub use error::UDisksError;
pub use infra::groups::current_user_groups;
pub use infra::usage::{StatvfsStats, usage_for_mount_point};
pub use manager::{UDisksDeviceManager, UDisksProxy};
pub use properties::decode_properties;

/// Well-known bus name of the storage service.
pub const UDISKS_SERVICE: &str = "org.freedesktop.UDisks";
/// Interface carrying the per-device properties and actions.
pub const UDISKS_DEVICE_INTERFACE: &str = "org.freedesktop.UDisks.Device";
