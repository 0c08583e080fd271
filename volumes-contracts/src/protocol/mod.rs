// SPDX-License-Identifier: GPL-3.0-only

pub mod error;
pub mod id;
pub mod operations;

pub use error::{Precondition, VolumeError, VolumeErrorKind};
pub use id::RequestId;
pub use operations::{OperationKind, OperationPhase};
