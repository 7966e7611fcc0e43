//! Experience and gold granted at the end of a battle.

use crate::action::BattleError;
use crate::config::BattleConfig;
use crate::roster::EnemyTemplate;
use crate::state::{BattleOutcome, Combatant, CombatantId, SessionId, Side};
use crate::BattleSession;

/// Rewards produced for one finished battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardRecord {
    pub session_id: SessionId,
    pub outcome: BattleOutcome,
    /// XP granted to each recipient.
    pub xp: u32,
    /// Gold granted to each recipient.
    pub gold: u32,
    /// Surviving party members that receive the reward.
    pub recipients: Vec<CombatantId>,
    pub turns_taken: u32,
    pub par_turns: u32,
}

/// Computes rewards exactly once per session.
pub struct RewardResolver;

impl RewardResolver {
    /// Resolves rewards for a finished session.
    ///
    /// The first call on a terminal session returns the record; later calls
    /// return `None`. An escaped battle grants nothing and also returns
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::NotTerminal`] while the battle is still running.
    pub fn resolve(session: &mut BattleSession) -> Result<Option<RewardRecord>, BattleError> {
        let outcome = session.outcome().ok_or(BattleError::NotTerminal {
            state: session.state(),
        })?;

        if !session.mark_rewards_granted() || outcome == BattleOutcome::Escaped {
            return Ok(None);
        }

        Ok(Some(Self::compute(
            session.session_id(),
            session.template(),
            outcome,
            session.combatants(),
            session.ally_turns(),
            session.env().config(),
        )))
    }

    /// Pure reward formula.
    ///
    /// ```text
    /// spare = max(0, par_turns - turns_taken)
    /// xp    = template.xp + xp_per_spare_turn * spare
    /// gold  = template.gold + template.gold * spare / (2 * par_turns)
    /// ```
    ///
    /// Defeat yields zero xp and gold.
    pub fn compute(
        session_id: &SessionId,
        template: &EnemyTemplate,
        outcome: BattleOutcome,
        combatants: &[Combatant],
        turns_taken: u32,
        config: &BattleConfig,
    ) -> RewardRecord {
        let recipients: Vec<CombatantId> = combatants
            .iter()
            .filter(|c| c.side == Side::Ally && c.in_rotation())
            .map(|c| c.id)
            .collect();

        let (xp, gold) = match outcome {
            BattleOutcome::Victory => {
                let spare = template.par_turns.saturating_sub(turns_taken);
                let xp = template
                    .xp
                    .saturating_add(config.xp_per_spare_turn.saturating_mul(spare));
                let bonus = if template.par_turns == 0 {
                    0
                } else {
                    (u64::from(template.gold) * u64::from(spare)
                        / (2 * u64::from(template.par_turns))) as u32
                };
                (xp, template.gold.saturating_add(bonus))
            }
            BattleOutcome::Defeat | BattleOutcome::Escaped => (0, 0),
        };

        RewardRecord {
            session_id: session_id.clone(),
            outcome,
            xp,
            gold,
            recipients,
            turns_taken,
            par_turns: template.par_turns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::EnemySpec;

    fn template() -> EnemyTemplate {
        EnemyTemplate::new("wolves", "Wolves", vec![EnemySpec::new("Wolf", 30, 8, 1)])
            .with_rewards(40, 20, 6)
    }

    fn party() -> Vec<Combatant> {
        vec![
            Combatant::new(CombatantId(1), "A", Side::Ally, 50, 0, 10, 0),
            Combatant::new(CombatantId(2), "B", Side::Ally, 50, 0, 10, 0),
        ]
    }

    #[test]
    fn fast_victory_earns_bonus() {
        let record = RewardResolver::compute(
            &SessionId::new("game-7"),
            &template(),
            BattleOutcome::Victory,
            &party(),
            2,
            &BattleConfig::default(),
        );
        // spare = 4: xp = 40 + 5*4, gold = 20 + 20*4/12
        assert_eq!(record.xp, 60);
        assert_eq!(record.gold, 26);
        assert_eq!(record.recipients, vec![CombatantId(1), CombatantId(2)]);
        assert_eq!(record.session_id.as_str(), "game-7");
    }

    #[test]
    fn slow_victory_gets_base_only_and_skips_fallen() {
        let mut members = party();
        members[1].hp = 0;
        let record = RewardResolver::compute(
            &SessionId::new("game-7"),
            &template(),
            BattleOutcome::Victory,
            &members,
            9,
            &BattleConfig::default(),
        );
        assert_eq!((record.xp, record.gold), (40, 20));
        assert_eq!(record.recipients, vec![CombatantId(1)]);
    }

    #[test]
    fn defeat_grants_nothing() {
        let record = RewardResolver::compute(
            &SessionId::new("game-7"),
            &template(),
            BattleOutcome::Defeat,
            &party(),
            1,
            &BattleConfig::default(),
        );
        assert_eq!((record.xp, record.gold), (0, 0));
    }
}
