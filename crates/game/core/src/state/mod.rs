//! Authoritative battle state.
//!
//! Identifiers, combatants and the lifecycle enums live here; snapshots and
//! diffs are the read-only views handed to clients.

mod combatant;
mod delta;
mod ids;
mod phase;
mod snapshot;

pub use combatant::{Combatant, Side};
pub use delta::{CombatantChanges, CombatantFields, SnapshotDiff};
pub use ids::{AbilityId, CombatantId, PlayerId, SessionId};
pub use phase::{BattleOutcome, BattleState};
pub use snapshot::BattleSnapshot;
