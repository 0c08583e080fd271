// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    List,
    Mount,
    Unmount,
    Eject,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Mount => "mount",
            Self::Unmount => "unmount",
            Self::Eject => "eject",
        };
        f.write_str(name)
    }
}

/// Lifecycle of one orchestrated request.
///
/// ```text
/// Start -> FetchingProperties -> PreconditionFailed
///                             -> Invoking -> Succeeded | Failed
/// ```
///
/// `FetchingProperties` may also end in `Failed` (transport error) or, for
/// listings that invoke nothing, `Succeeded`. `Invoking` may chain into a
/// further `Invoking` step (eject unmounts before ejecting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationPhase {
    Start,
    FetchingProperties,
    PreconditionFailed,
    Invoking,
    Succeeded,
    Failed,
}

impl OperationPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::PreconditionFailed | Self::Succeeded | Self::Failed
        )
    }

    pub fn can_advance_to(self, next: OperationPhase) -> bool {
        use OperationPhase::*;

        matches!(
            (self, next),
            (Start, FetchingProperties)
                | (FetchingProperties, PreconditionFailed)
                | (FetchingProperties, Invoking)
                | (FetchingProperties, Succeeded)
                | (FetchingProperties, Failed)
                | (Invoking, Invoking)
                | (Invoking, Succeeded)
                | (Invoking, Failed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestId;

    #[test]
    fn request_id_roundtrips_as_uuid_string() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).expect("serialize request id");
        let parsed: RequestId = serde_json::from_str(&json).expect("deserialize request id");
        assert_eq!(parsed, id);
    }

    #[test]
    fn terminal_phases_do_not_advance() {
        use OperationPhase::*;

        for terminal in [PreconditionFailed, Succeeded, Failed] {
            assert!(terminal.is_terminal());
            for next in [
                Start,
                FetchingProperties,
                PreconditionFailed,
                Invoking,
                Succeeded,
                Failed,
            ] {
                assert!(!terminal.can_advance_to(next));
            }
        }
    }

    #[test]
    fn precondition_failure_only_follows_fetch() {
        use OperationPhase::*;

        assert!(FetchingProperties.can_advance_to(PreconditionFailed));
        assert!(!Start.can_advance_to(PreconditionFailed));
        assert!(!Invoking.can_advance_to(PreconditionFailed));
        assert!(!Start.can_advance_to(Invoking));
    }

    #[test]
    fn operation_kind_names() {
        assert_eq!(OperationKind::Eject.to_string(), "eject");
        let json = serde_json::to_string(&OperationKind::Unmount).unwrap();
        assert_eq!(json, r#""unmount""#);
    }
}
