//! Status effect system for combatants.
//!
//! Status effects are timed conditions attached to a combatant: damage over
//! time (poison, burn), crowd control (freeze) and stat modifiers (buff,
//! debuff). Instances count down in *owner turns*: every time the owning
//! combatant finishes a turn, [`StatusEffectRegistry::apply_tick`] applies
//! their magnitude and decrements `remaining_turns`.
//!
//! How a second application of an already-active kind behaves is declared
//! per kind by a [`StatusRule`] in the registry, never globally.

mod registry;

pub use registry::{ApplyOutcome, StatusEffectRegistry, StatusRule, TickDamage, TickReport};

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::state::CombatantId;

/// Kinds of status effects.
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
pub enum StatusKind {
    /// HP loss every owner turn; independent applications may stack.
    Poison,
    /// Fire damage every owner turn.
    Burn,
    /// Owner skips its turns while frozen.
    Freeze,
    /// Adds `magnitude` to attack power while active.
    Buff,
    /// Removes `magnitude` from attack power while active.
    Debuff,
}

impl StatusKind {
    /// Number of distinct kinds; used to size per-kind tables.
    pub const COUNT: usize = 5;

    /// Dense index for per-kind tables.
    pub const fn index(self) -> usize {
        match self {
            Self::Poison => 0,
            Self::Burn => 1,
            Self::Freeze => 2,
            Self::Buff => 3,
            Self::Debuff => 4,
        }
    }

    /// Returns true for kinds that deal damage when ticked.
    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, Self::Poison | Self::Burn)
    }

    /// Returns true for kinds an AI should only apply to opponents.
    pub const fn is_harmful(self) -> bool {
        !matches!(self, Self::Buff)
    }
}

/// What happens when a kind is applied while an instance is already active.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StackPolicy {
    /// Reset duration (and magnitude) of the existing instance.
    Refresh,
    /// Add a second, independent instance.
    Stack,
    /// Drop the new application.
    Ignore,
}

/// Descriptor of a status application carried by abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub kind: StatusKind,
    pub magnitude: u32,
    pub turns: u32,
}

impl StatusApplication {
    pub fn new(kind: StatusKind, magnitude: u32, turns: u32) -> Self {
        Self {
            kind,
            magnitude,
            turns,
        }
    }
}

/// A status effect attached to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    pub kind: StatusKind,
    pub magnitude: u32,
    /// Owner turns left. Zero-duration instances are purged at the start of
    /// the owner's next tick.
    pub remaining_turns: u32,
    pub stack_policy: StackPolicy,
    /// Combatant that applied the effect.
    pub source: CombatantId,
}

/// Ordered set of status effects on one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffectInstance, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Checks if a kind has at least one active instance.
    pub fn has(&self, kind: StatusKind) -> bool {
        self.active().any(|e| e.kind == kind)
    }

    /// Number of active instances of a kind.
    pub fn count(&self, kind: StatusKind) -> usize {
        self.active().filter(|e| e.kind == kind).count()
    }

    /// Sum of magnitudes over active instances of a kind.
    pub fn total_magnitude(&self, kind: StatusKind) -> u32 {
        self.active()
            .filter(|e| e.kind == kind)
            .map(|e| e.magnitude)
            .sum()
    }

    /// Iterator over instances that still have turns left.
    pub fn active(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter().filter(|e| e.remaining_turns > 0)
    }

    /// Iterator over all instances, in application order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.effects.is_full()
    }

    pub(crate) fn first_active_mut(&mut self, kind: StatusKind) -> Option<&mut StatusEffectInstance> {
        self.effects
            .iter_mut()
            .find(|e| e.kind == kind && e.remaining_turns > 0)
    }

    pub(crate) fn push(&mut self, instance: StatusEffectInstance) -> bool {
        self.effects.try_push(instance).is_ok()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffectInstance> {
        self.effects.iter_mut()
    }

    pub(crate) fn purge_expired(&mut self) {
        self.effects.retain(|e| e.remaining_turns > 0);
    }
}
