use crate::action::ActionRecord;
use crate::state::{BattleOutcome, BattleState, Combatant, CombatantId, SessionId};

/// Full immutable copy of a battle session.
///
/// Sent to clients on subscribe and used to rebuild state after a reconnect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub session_id: SessionId,
    pub state: BattleState,
    pub turn_owner: Option<CombatantId>,
    pub turn_number: u32,
    pub action_in_flight: bool,
    pub outcome: Option<BattleOutcome>,
    pub seed: u64,
    pub combatants: Vec<Combatant>,
    pub log: Vec<ActionRecord>,
}

impl BattleSnapshot {
    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    /// Latest log entry, if any action has resolved.
    pub fn last_entry(&self) -> Option<&ActionRecord> {
        self.log.last()
    }
}
