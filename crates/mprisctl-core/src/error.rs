use thiserror::Error;

use crate::bus::Fault;

/// Errors surfaced by service resolution and command dispatch.
#[derive(Debug, Error)]
pub enum Error {
    /// The user's selector matched no directory entry, either as an index or
    /// as a name suffix. Carries the original selector text for diagnostics.
    #[error("MPRIS2 service \"{0}\" not found")]
    SelectorNotFound(String),

    /// The named endpoint cannot be bound to a live bus object.
    #[error("player {0} is not reachable on the bus")]
    EndpointUnreachable(String),

    /// The player globally refuses control (`CanControl` is false).
    #[error("player {0} does not provide control access")]
    ControlDenied(String),

    /// The player lacks the capability for the requested command.
    #[error("player {player} does not support {operation}")]
    OperationUnsupported {
        /// Player that refused the operation.
        player: String,
        /// Name of the unsupported operation.
        operation: String,
    },

    /// Any other transport-level fault, propagated unmodified.
    #[error("D-Bus operation failed: {0}")]
    Transport(#[from] Fault),
}

impl Error {
    /// Process exit code for this error: 2 for a capability miss, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::OperationUnsupported { .. } => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FaultKind;

    #[test]
    fn selector_not_found_keeps_selector_text() {
        let err = Error::SelectorNotFound("spotify".into());
        assert_eq!(err.to_string(), "MPRIS2 service \"spotify\" not found");
    }

    #[test]
    fn exit_codes_match_original_contract() {
        assert_eq!(
            Error::OperationUnsupported {
                player: "p".into(),
                operation: "toggle".into(),
            }
            .exit_code(),
            2
        );
        assert_eq!(Error::ControlDenied("p".into()).exit_code(), 1);
        assert_eq!(Error::SelectorNotFound("3".into()).exit_code(), 1);
        assert_eq!(
            Error::Transport(Fault::new(FaultKind::Transport, "lost")).exit_code(),
            1
        );
    }
}
