//! Ability definitions and the static catalogs built from them.
//!
//! Abilities are immutable catalog entries: a cost, a cooldown, a target
//! shape and one to three tagged effects. Effects are resolved by exhaustive
//! matching on [`AbilityEffect`], so adding a new effect kind is a
//! compile-checked change to the resolver.

mod catalog;
mod class;

pub use catalog::{AbilityCatalog, CatalogError};
pub use class::{ClassCatalog, ClassProfile};

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::state::AbilityId;
use crate::status::StatusApplication;

/// Player classes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Class {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

/// Which combatants an ability may target, relative to the user's side.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetKind {
    /// The user; no target id needed.
    SelfOnly,
    /// One live opponent.
    SingleEnemy,
    /// Every live opponent; no target id needed.
    AllEnemies,
    /// One live combatant on the user's side (the user included).
    SingleAlly,
}

impl TargetKind {
    /// Whether the request must name a target.
    pub const fn requires_target(self) -> bool {
        matches!(self, Self::SingleEnemy | Self::SingleAlly)
    }
}

/// A single effect applied to each resolved target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    /// Hit for `effective power + bonus - armor` (floored at the minimum).
    Damage { bonus: u32 },
    /// Restore HP up to the target's maximum.
    Heal { amount: u32 },
    /// Attach a status effect following the kind's stacking rule.
    ApplyStatus(StatusApplication),
}

/// Effects list attached to an ability.
pub type AbilityEffects = ArrayVec<AbilityEffect, { BattleConfig::MAX_ABILITY_EFFECTS }>;

/// Immutable catalog entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    /// Class allowed to use the ability; `None` means any combatant whose
    /// kit lists it (enemies included).
    #[cfg_attr(feature = "serde", serde(default))]
    pub class_restriction: Option<Class>,
    pub mana_cost: u32,
    /// Owner turns before the ability is usable again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_turns: u32,
    pub target: TargetKind,
    pub effects: AbilityEffects,
}

impl Ability {
    pub fn new(id: impl Into<AbilityId>, name: impl Into<String>, target: TargetKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class_restriction: None,
            mana_cost: 0,
            cooldown_turns: 0,
            target,
            effects: ArrayVec::new(),
        }
    }

    pub fn restricted_to(mut self, class: Class) -> Self {
        self.class_restriction = Some(class);
        self
    }

    pub fn costing(mut self, mana_cost: u32) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown_turns: u32) -> Self {
        self.cooldown_turns = cooldown_turns;
        self
    }

    /// Appends an effect; extra effects beyond the capacity are dropped and
    /// rejected later by catalog validation.
    pub fn with_effect(mut self, effect: AbilityEffect) -> Self {
        let _ = self.effects.try_push(effect);
        self
    }

    pub fn deals_damage(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, AbilityEffect::Damage { .. }))
    }

    pub fn heals(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, AbilityEffect::Heal { .. }))
    }

    /// Whether the ability targets the user's opponents.
    pub fn is_offensive(&self) -> bool {
        matches!(self.target, TargetKind::SingleEnemy | TargetKind::AllEnemies)
    }
}
