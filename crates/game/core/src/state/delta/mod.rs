//! Snapshot diffs broadcast after each resolved step.
//!
//! A diff carries only what moved between two [`BattleSnapshot`]s: session
//! level fields when they changed and, per changed combatant, a bitmask plus
//! the new value. Log entries travel next to the diff, not inside it.

mod bitmask;
mod changes;

pub use bitmask::CombatantFields;
pub use changes::CombatantChanges;

use crate::action::ActionRecord;
use crate::state::{BattleOutcome, BattleSnapshot, BattleState, CombatantId};

/// Minimal description of what changed between two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotDiff {
    pub state: Option<BattleState>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none", with = "double_option")
    )]
    pub turn_owner: Option<Option<CombatantId>>,
    pub turn_number: Option<u32>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none", with = "double_option")
    )]
    pub outcome: Option<Option<BattleOutcome>>,
    pub combatants: Vec<CombatantChanges>,
}

impl SnapshotDiff {
    /// Creates a diff by comparing two snapshots of the same session.
    ///
    /// Combatants are matched by id; the roster never grows or shrinks during
    /// a battle, so only updates are tracked.
    pub fn between(before: &BattleSnapshot, after: &BattleSnapshot) -> Self {
        let combatants = after
            .combatants
            .iter()
            .filter_map(|now| match before.combatant(now.id) {
                Some(prev) => CombatantChanges::from_states(prev, now),
                None => Some(CombatantChanges {
                    id: now.id,
                    fields: CombatantFields::all(),
                    value: now.clone(),
                }),
            })
            .collect();

        Self {
            state: (before.state != after.state).then_some(after.state),
            turn_owner: (before.turn_owner != after.turn_owner).then_some(after.turn_owner),
            turn_number: (before.turn_number != after.turn_number).then_some(after.turn_number),
            outcome: (before.outcome != after.outcome).then_some(after.outcome),
            combatants,
        }
    }

    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.state.is_none()
            && self.turn_owner.is_none()
            && self.turn_number.is_none()
            && self.outcome.is_none()
            && self.combatants.is_empty()
    }

    /// Applies the diff on top of an older snapshot.
    pub fn apply_to(&self, snapshot: &mut BattleSnapshot) {
        if let Some(state) = self.state {
            snapshot.state = state;
        }
        if let Some(turn_owner) = self.turn_owner {
            snapshot.turn_owner = turn_owner;
        }
        if let Some(turn_number) = self.turn_number {
            snapshot.turn_number = turn_number;
        }
        if let Some(outcome) = self.outcome {
            snapshot.outcome = outcome;
        }

        for change in &self.combatants {
            match snapshot.combatants.iter_mut().find(|c| c.id == change.id) {
                Some(slot) => *slot = change.value.clone(),
                None => snapshot.combatants.push(change.value.clone()),
            }
        }
    }
}

/// Keeps "changed to none" distinct from "unchanged": an absent field is
/// unchanged, an explicit null clears the value.
#[cfg(feature = "serde")]
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

impl BattleSnapshot {
    /// Applies one broadcast step: the diff, then its log entry.
    pub fn apply_delta(&mut self, diff: &SnapshotDiff, entry: Option<&ActionRecord>) {
        diff.apply_to(self);
        if let Some(entry) = entry {
            self.log.push(entry.clone());
        }
    }
}
