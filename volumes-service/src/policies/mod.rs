// SPDX-License-Identifier: GPL-3.0-only

pub mod groups;
pub mod visibility;

pub use groups::GroupPolicy;
pub use visibility::{FilterPolicy, VolumeFilter};
