// SPDX-License-Identifier: GPL-3.0-only

//! Test doubles for the volume manager's collaborators
//!
//! - [`FakeBackend`]: scripted storage service recording every call
//! - [`FixedStats`]: canned mount-point usage
//! - [`RecordingHandler`]: host sink capturing reported outcomes
//! - [`fixtures`]: property snapshots for common device kinds

pub mod backend;
pub mod fixtures;
pub mod handler;
pub mod stats;

pub use backend::{Call, FakeBackend};
pub use handler::{HandlerCall, RecordingHandler};
pub use stats::FixedStats;
