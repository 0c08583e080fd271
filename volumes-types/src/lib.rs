// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for the volume manager
//!
//! This crate defines the data shared by every layer of the stack:
//!
//! - **volumes-udisks**: decodes UDisks property bags into [`DeviceProperties`]
//! - **volumes-service**: projects [`DeviceProperties`] into [`Volume`] records
//!   and reports them to its host as [`VolumePayload`] JSON
//!
//! ## Lifecycle
//!
//! - `DeviceProperties` → immutable snapshot produced by every property fetch
//! - `Volume` → policy-filtered projection of one snapshot, discarded after use
//!
//! Nothing here performs I/O.

pub mod common;
pub mod device;
pub mod event;
pub mod groups;
pub mod volume;

pub use common::{MountUsage, bytes_to_pretty};
pub use device::{DeviceId, DeviceProperties};
pub use event::{DeviceEvent, DevicePayload, DeviceSignal};
pub use groups::GroupMembership;
pub use volume::{RawVolumeFields, Volume, VolumePayload};
