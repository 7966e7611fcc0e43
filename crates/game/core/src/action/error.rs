//! Rejections produced while validating an action request.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{AbilityId, BattleState, CombatantId};

/// Why a requested target was refused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum InvalidTargetReason {
    /// The action needs a target and none was given.
    Missing,
    /// No combatant with that id is in the battle.
    NotFound,
    /// The target has zero HP.
    Defeated,
    /// The target left the battle.
    Fled,
    /// The target is on the wrong side for this action.
    WrongSide,
    /// The action takes no target but one was given.
    Unexpected,
}

/// Errors surfaced by [`crate::BattleSession`] and [`crate::RewardResolver`].
///
/// A rejected request never mutates session state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("combatant {actor} cannot act: it is {turn_owner}'s turn")]
    NotYourTurn {
        actor: CombatantId,
        turn_owner: CombatantId,
    },

    #[error("combatant {actor} needs {required} mana for '{ability}' but has {available}")]
    InsufficientMana {
        actor: CombatantId,
        ability: AbilityId,
        required: u32,
        available: u32,
    },

    #[error("ability '{ability}' of combatant {actor} is on cooldown for {remaining} more turn(s)")]
    OnCooldown {
        actor: CombatantId,
        ability: AbilityId,
        remaining: u32,
    },

    #[error("combatant {actor} cannot target {target:?}: {reason}")]
    InvalidTarget {
        actor: CombatantId,
        target: Option<CombatantId>,
        reason: InvalidTargetReason,
    },

    #[error("previous action is still being resolved")]
    ActionInFlight,

    #[error("battle is not accepting actions in state {state}")]
    BattleNotActive { state: BattleState },

    #[error("unknown ability '{ability}'")]
    UnknownAbility { ability: AbilityId },

    #[error("combatant {actor} cannot use ability '{ability}'")]
    AbilityNotAvailable {
        actor: CombatantId,
        ability: AbilityId,
    },

    #[error("unknown combatant {id}")]
    UnknownCombatant { id: CombatantId },

    #[error("intro sequence already in progress")]
    IntroInProgress,

    #[error("battle has not ended (state {state})")]
    NotTerminal { state: BattleState },

    #[error("rewards must be resolved before teardown")]
    RewardsPending,
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        use BattleError::*;
        match self {
            NotYourTurn { .. }
            | InsufficientMana { .. }
            | OnCooldown { .. }
            | ActionInFlight
            | BattleNotActive { .. }
            | IntroInProgress => ErrorSeverity::Recoverable,
            InvalidTarget { .. }
            | UnknownAbility { .. }
            | AbilityNotAvailable { .. }
            | UnknownCombatant { .. } => ErrorSeverity::Validation,
            NotTerminal { .. } | RewardsPending => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use BattleError::*;
        match self {
            NotYourTurn { .. } => "BATTLE_NOT_YOUR_TURN",
            InsufficientMana { .. } => "BATTLE_INSUFFICIENT_MANA",
            OnCooldown { .. } => "BATTLE_ON_COOLDOWN",
            InvalidTarget { .. } => "BATTLE_INVALID_TARGET",
            ActionInFlight => "BATTLE_ACTION_IN_FLIGHT",
            BattleNotActive { .. } => "BATTLE_NOT_ACTIVE",
            UnknownAbility { .. } => "BATTLE_UNKNOWN_ABILITY",
            AbilityNotAvailable { .. } => "BATTLE_ABILITY_NOT_AVAILABLE",
            UnknownCombatant { .. } => "BATTLE_UNKNOWN_COMBATANT",
            IntroInProgress => "BATTLE_INTRO_IN_PROGRESS",
            NotTerminal { .. } => "BATTLE_NOT_TERMINAL",
            RewardsPending => "BATTLE_REWARDS_PENDING",
        }
    }
}
