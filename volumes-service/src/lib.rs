// SPDX-License-Identifier: GPL-3.0-only

//! Volume manager core
//!
//! Turns storage-service hotplug signals and property bags into
//! policy-filtered [`Volume`](volumes_types::Volume) records, and drives
//! mount, unmount and eject requests to a single terminal outcome.

pub mod client;
pub mod config;
pub mod events;
pub mod hotplug;
pub mod manager;
pub mod orchestrator;
pub mod policies;

pub use client::DeviceQueryClient;
pub use config::{ConfigError, ListingConfig, LoggingConfig, ServiceConfig};
pub use events::{DeviceEventStream, EventEmitter};
pub use hotplug::HotplugSubscriber;
pub use manager::{VolumeManager, VolumeRequest};
pub use orchestrator::{MountReport, OperationOrchestrator, OperationOutcome};
pub use policies::{FilterPolicy, GroupPolicy, VolumeFilter};
