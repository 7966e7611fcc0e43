use super::ActionKind;
use crate::state::{AbilityId, BattleOutcome, BattleState, CombatantId};
use crate::status::{ApplyOutcome, StatusKind, TickReport};

/// One entry of the battle log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRecord {
    pub turn_number: u32,
    pub actor: CombatantId,
    pub kind: ActionKind,
    pub ability: Option<AbilityId>,
    pub target: Option<CombatantId>,
    /// Set for idle-timeout defends and frozen skips.
    pub automatic: bool,
    pub summary: ResultSummary,
}

/// What an action did, in resolution order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultSummary {
    pub targets: Vec<TargetOutcome>,
    pub mana_spent: u32,
    /// Actor's end-of-turn tick (status damage, expiries, mana regen).
    pub tick: TickReport,
    pub fled: bool,
    pub state_after: BattleState,
    pub outcome: Option<BattleOutcome>,
}

impl ResultSummary {
    pub(crate) fn new(state: BattleState) -> Self {
        Self {
            targets: Vec::new(),
            mana_spent: 0,
            tick: TickReport::default(),
            fled: false,
            state_after: state,
            outcome: None,
        }
    }

    /// Total direct damage dealt to all targets.
    pub fn total_damage(&self) -> u32 {
        self.targets.iter().map(|t| t.damage).sum()
    }

    pub fn target(&self, id: CombatantId) -> Option<&TargetOutcome> {
        self.targets.iter().find(|t| t.target == id)
    }
}

/// Effect of an action on one target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: CombatantId,
    pub damage: u32,
    pub healed: u32,
    pub statuses: Vec<StatusOutcome>,
    pub hp_after: u32,
    pub defeated: bool,
}

impl TargetOutcome {
    pub(crate) fn new(target: CombatantId, hp: u32) -> Self {
        Self {
            target,
            damage: 0,
            healed: 0,
            statuses: Vec::new(),
            hp_after: hp,
            defeated: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusOutcome {
    pub kind: StatusKind,
    pub result: ApplyOutcome,
}
