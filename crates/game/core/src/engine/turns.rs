use super::BattleSession;
use crate::state::{BattleOutcome, BattleState, Side};

/// Turn rotation and terminal detection.
impl BattleSession {
    pub(super) fn owner_index(&self) -> Option<usize> {
        let owner = self.turn_owner?;
        self.index_of(owner)
    }

    /// Next combatant in rotation after `from`, wrapping around.
    ///
    /// Returns `from` itself when nobody else can act.
    pub(super) fn next_in_rotation(&self, from: usize) -> usize {
        let len = self.combatants.len();
        (1..=len)
            .map(|step| (from + step) % len)
            .find(|&idx| self.combatants[idx].in_rotation())
            .unwrap_or(from)
    }

    pub(super) fn first_in_rotation(&self) -> Option<usize> {
        self.combatants.iter().position(|c| c.in_rotation())
    }

    /// Hands the turn to `idx`: clears its defend stance, counts its
    /// cooldowns down and picks the state matching who acts next.
    pub(super) fn enter_turn(&mut self, idx: usize) {
        let combatant = &mut self.combatants[idx];
        combatant.defending = false;
        combatant.tick_cooldowns();

        self.turn_owner = Some(combatant.id);
        self.state = match combatant.side {
            Side::Enemy => BattleState::EnemyTurn,
            // Frozen allies are skipped by the engine, not by the client
            Side::Ally if combatant.is_frozen() => BattleState::Resolving,
            Side::Ally => BattleState::AwaitingAction,
        };
    }

    /// Victory is checked before defeat so a mutual wipe counts as a win.
    pub(super) fn terminal_outcome(&self) -> Option<BattleOutcome> {
        let side_down = |side: Side| {
            self.combatants
                .iter()
                .filter(|c| c.side == side)
                .all(|c| !c.is_alive())
        };

        if side_down(Side::Enemy) {
            Some(BattleOutcome::Victory)
        } else if side_down(Side::Ally) {
            Some(BattleOutcome::Defeat)
        } else if !self
            .combatants
            .iter()
            .any(|c| c.side == Side::Ally && c.in_rotation())
        {
            Some(BattleOutcome::Escaped)
        } else {
            None
        }
    }

    pub(super) fn finish(&mut self, outcome: BattleOutcome) {
        self.outcome = Some(outcome);
        self.turn_owner = None;
        self.state = match outcome {
            BattleOutcome::Victory => BattleState::Victory,
            BattleOutcome::Defeat => BattleState::Defeat,
            BattleOutcome::Escaped => BattleState::Idle,
        };
    }

    /// Ends the battle if a side is out, otherwise passes the turn on.
    pub(super) fn advance(&mut self, from: usize) {
        if let Some(outcome) = self.terminal_outcome() {
            self.finish(outcome);
            return;
        }
        let next = self.next_in_rotation(from);
        self.enter_turn(next);
    }
}
