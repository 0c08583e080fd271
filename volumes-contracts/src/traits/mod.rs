// SPDX-License-Identifier: GPL-3.0-only

pub mod backend;
pub mod handler;
pub mod stats;

pub use backend::{DeviceSignalStream, StorageBackend};
pub use handler::RequestHandler;
pub use stats::MountStats;
