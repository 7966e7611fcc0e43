//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule violations from the battle core and failures of worker
//! coordination so clients receive one error type with a stable code.
use battle_core::{
    BattleError, CombatantId, ErrorSeverity, GameError, PlayerId, SessionId, SetupError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session '{session_id}' not found")]
    SessionNotFound { session_id: SessionId },

    #[error("session '{session_id}' already exists")]
    SessionAlreadyExists { session_id: SessionId },

    #[error("player '{player}' does not control combatant {combatant}")]
    UnauthorizedCombatant {
        player: PlayerId,
        combatant: CombatantId,
    },

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("subscriber fell behind by {skipped} message(s)")]
    SubscriberLagged { skipped: u64 },

    #[error("invalid value '{value}' for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Battle(#[from] BattleError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::SessionNotFound { .. }
            | RuntimeError::SessionAlreadyExists { .. }
            | RuntimeError::UnauthorizedCombatant { .. } => ErrorSeverity::Validation,
            RuntimeError::SubscriberLagged { .. } => ErrorSeverity::Recoverable,
            RuntimeError::CommandChannelClosed | RuntimeError::ReplyChannelClosed(_) => {
                ErrorSeverity::Internal
            }
            RuntimeError::InvalidConfig { .. } => ErrorSeverity::Fatal,
            RuntimeError::Setup(e) => e.severity(),
            RuntimeError::Battle(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::SessionNotFound { .. } => "RUNTIME_SESSION_NOT_FOUND",
            RuntimeError::SessionAlreadyExists { .. } => "RUNTIME_SESSION_ALREADY_EXISTS",
            RuntimeError::UnauthorizedCombatant { .. } => "RUNTIME_UNAUTHORIZED_COMBATANT",
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::SubscriberLagged { .. } => "RUNTIME_SUBSCRIBER_LAGGED",
            RuntimeError::InvalidConfig { .. } => "RUNTIME_INVALID_CONFIG",
            RuntimeError::Setup(e) => e.error_code(),
            RuntimeError::Battle(e) => e.error_code(),
        }
    }
}

/// Refusal delivered to the sender of a request only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub code: String,
    pub message: String,
}

impl Rejection {
    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}

impl From<&RuntimeError> for Rejection {
    fn from(error: &RuntimeError) -> Self {
        Self {
            code: error.error_code().to_owned(),
            message: error.to_string(),
        }
    }
}

impl From<RuntimeError> for Rejection {
    fn from(error: RuntimeError) -> Self {
        Self::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battle_errors_keep_their_code() {
        let rejection = Rejection::from(RuntimeError::Battle(BattleError::ActionInFlight));
        assert_eq!(rejection.code, "BATTLE_ACTION_IN_FLIGHT");
        assert_eq!(rejection.message, "previous action is still being resolved");
    }

    #[test]
    fn unauthorized_is_a_validation_failure() {
        let error = RuntimeError::UnauthorizedCombatant {
            player: PlayerId::new("mallory"),
            combatant: CombatantId(1),
        };
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert!(Rejection::from(&error).is("RUNTIME_UNAUTHORIZED_COMBATANT"));
    }

    #[test]
    fn only_channel_failures_are_internal() {
        assert!(RuntimeError::CommandChannelClosed.severity().is_internal());
        assert!(
            !RuntimeError::Battle(BattleError::ActionInFlight)
                .severity()
                .is_internal()
        );
        assert!(
            !RuntimeError::SessionNotFound {
                session_id: SessionId::new("nope"),
            }
            .severity()
            .is_internal()
        );
    }
}
