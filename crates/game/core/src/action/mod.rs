//! Action requests, their validation errors and the log records they produce.

mod error;
mod record;

pub use error::{BattleError, InvalidTargetReason};
pub use record::{ActionRecord, ResultSummary, StatusOutcome, TargetOutcome};

use crate::state::{AbilityId, CombatantId};

/// An action a combatant asks to perform on its turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum BattleAction {
    /// Basic attack against one opponent.
    Attack { target: CombatantId },
    /// Halve incoming hits until the start of the actor's next turn.
    Defend,
    /// Use a catalog ability; `target` is required for single-target kinds.
    Ability {
        ability: AbilityId,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<CombatantId>,
    },
    /// Leave the battle.
    Flee,
}

impl BattleAction {
    pub fn attack(target: CombatantId) -> Self {
        Self::Attack { target }
    }

    pub fn ability(ability: impl Into<AbilityId>, target: Option<CombatantId>) -> Self {
        Self::Ability {
            ability: ability.into(),
            target,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Attack { .. } => ActionKind::Attack,
            Self::Defend => ActionKind::Defend,
            Self::Ability { .. } => ActionKind::Ability,
            Self::Flee => ActionKind::Flee,
        }
    }
}

/// Kind of a resolved action, as recorded in the log.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionKind {
    Attack,
    Defend,
    Ability,
    Flee,
    /// Turn passed without an action (frozen combatant).
    Skip,
}
