// SPDX-License-Identifier: GPL-3.0-only

pub mod protocol;
pub mod traits;

pub use protocol::{
    OperationKind, OperationPhase, Precondition, RequestId, VolumeError, VolumeErrorKind,
};
pub use traits::{DeviceSignalStream, MountStats, RequestHandler, StorageBackend};
