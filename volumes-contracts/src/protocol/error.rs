// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeErrorKind {
    /// A bus call failed or timed out.
    Transport,
    /// Device state does not allow the requested operation.
    Precondition,
    /// A collaborator could not answer at all.
    Unavailable,
}

impl VolumeErrorKind {
    /// Stable numeric code reported to hosts.
    pub fn code(self) -> u16 {
        match self {
            Self::Precondition => 409,
            Self::Transport => 502,
            Self::Unavailable => 503,
        }
    }
}

/// Device states that block an orchestrated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precondition {
    #[error("already mounted")]
    AlreadyMounted,
    #[error("not mounted")]
    NotMounted,
    #[error("not ejectable")]
    NotEjectable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind:?}: {message}")]
pub struct VolumeError {
    pub kind: VolumeErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precondition: Option<Precondition>,
}

impl VolumeError {
    pub fn new(kind: VolumeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            precondition: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(VolumeErrorKind::Transport, message)
    }

    pub fn violated(precondition: Precondition) -> Self {
        Self {
            kind: VolumeErrorKind::Precondition,
            message: precondition.to_string(),
            precondition: Some(precondition),
        }
    }

    pub fn is_precondition(&self) -> bool {
        self.kind == VolumeErrorKind::Precondition
    }
}

impl From<zbus::Error> for VolumeError {
    fn from(err: zbus::Error) -> Self {
        Self::transport(err.to_string())
    }
}

impl From<zbus::fdo::Error> for VolumeError {
    fn from(err: zbus::fdo::Error) -> Self {
        Self::transport(err.to_string())
    }
}
