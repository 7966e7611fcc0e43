//! Validation and resolution of a single turn.
//!
//! Resolution order for every action:
//! 1. consume mana and start the cooldown
//! 2. apply the base effect (hit, heal, defend, flee)
//! 3. attach status effects per the kind's stacking rule
//! 4. tick the actor's own status effects and regenerate its mana
//! 5. check for a terminal outcome, then pass the turn on

use std::sync::Arc;

use super::BattleSession;
use crate::ability::{Ability, AbilityEffect, TargetKind};
use crate::action::{
    ActionKind, ActionRecord, BattleAction, BattleError, InvalidTargetReason, ResultSummary,
    StatusOutcome, TargetOutcome,
};
use crate::combat::{ability_damage, attack_damage};
use crate::env::BattleEnv;
use crate::state::{BattleState, Combatant, CombatantId, Side};

/// A validated action, ready to resolve.
#[derive(Clone, Debug)]
pub(super) struct Plan {
    kind: ActionKind,
    ability: Option<Ability>,
    requested_target: Option<CombatantId>,
    targets: Vec<usize>,
}

impl Plan {
    pub(super) fn untargeted(kind: ActionKind) -> Self {
        Self {
            kind,
            ability: None,
            requested_target: None,
            targets: Vec::new(),
        }
    }
}

impl BattleSession {
    /// Checks an action against the current state without mutating anything.
    ///
    /// Errors are reported in a fixed order: ability lookup, class/kit,
    /// cooldown, mana, then target.
    pub(super) fn validate(&self, idx: usize, action: &BattleAction) -> Result<Plan, BattleError> {
        let actor = &self.combatants[idx];

        match action {
            BattleAction::Attack { target } => {
                let target_idx = self.check_target(actor, Some(*target), actor.side.opposing())?;
                Ok(Plan {
                    kind: ActionKind::Attack,
                    ability: None,
                    requested_target: Some(*target),
                    targets: vec![target_idx],
                })
            }
            BattleAction::Defend => Ok(Plan::untargeted(ActionKind::Defend)),
            BattleAction::Flee => Ok(Plan::untargeted(ActionKind::Flee)),
            BattleAction::Ability { ability, target } => {
                let definition = self.env.abilities().get(ability.as_str()).ok_or_else(|| {
                    BattleError::UnknownAbility {
                        ability: ability.clone(),
                    }
                })?;

                if !actor.knows(definition) {
                    return Err(BattleError::AbilityNotAvailable {
                        actor: actor.id,
                        ability: ability.clone(),
                    });
                }

                let remaining = actor.cooldown(ability.as_str());
                if remaining > 0 {
                    return Err(BattleError::OnCooldown {
                        actor: actor.id,
                        ability: ability.clone(),
                        remaining,
                    });
                }

                if actor.mana < definition.mana_cost {
                    return Err(BattleError::InsufficientMana {
                        actor: actor.id,
                        ability: ability.clone(),
                        required: definition.mana_cost,
                        available: actor.mana,
                    });
                }

                let targets = self.ability_targets(idx, definition.target, *target)?;
                Ok(Plan {
                    kind: ActionKind::Ability,
                    ability: Some(definition.clone()),
                    requested_target: *target,
                    targets,
                })
            }
        }
    }

    fn ability_targets(
        &self,
        idx: usize,
        kind: TargetKind,
        target: Option<CombatantId>,
    ) -> Result<Vec<usize>, BattleError> {
        let actor = &self.combatants[idx];
        let unexpected = || BattleError::InvalidTarget {
            actor: actor.id,
            target,
            reason: InvalidTargetReason::Unexpected,
        };

        match kind {
            TargetKind::SelfOnly => match target {
                Some(id) if id != actor.id => Err(unexpected()),
                _ => Ok(vec![idx]),
            },
            TargetKind::AllEnemies => match target {
                Some(_) => Err(unexpected()),
                None => Ok(self
                    .combatants
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.side != actor.side && c.in_rotation())
                    .map(|(i, _)| i)
                    .collect()),
            },
            TargetKind::SingleEnemy => Ok(vec![self.check_target(
                actor,
                target,
                actor.side.opposing(),
            )?]),
            TargetKind::SingleAlly => Ok(vec![self.check_target(actor, target, actor.side)?]),
        }
    }

    fn check_target(
        &self,
        actor: &Combatant,
        target: Option<CombatantId>,
        side: Side,
    ) -> Result<usize, BattleError> {
        let reject = |reason| BattleError::InvalidTarget {
            actor: actor.id,
            target,
            reason,
        };

        let id = target.ok_or_else(|| reject(InvalidTargetReason::Missing))?;
        let idx = self
            .index_of(id)
            .ok_or_else(|| reject(InvalidTargetReason::NotFound))?;
        let candidate = &self.combatants[idx];

        if candidate.side != side {
            Err(reject(InvalidTargetReason::WrongSide))
        } else if !candidate.is_alive() {
            Err(reject(InvalidTargetReason::Defeated))
        } else if candidate.fled {
            Err(reject(InvalidTargetReason::Fled))
        } else {
            Ok(idx)
        }
    }

    /// Applies a validated plan for the combatant at `idx` and advances the turn.
    pub(super) fn resolve(&mut self, idx: usize, plan: Plan, automatic: bool) -> ActionRecord {
        let env = Arc::clone(&self.env);
        let config = env.config();
        let actor_id = self.combatants[idx].id;
        let actor_side = self.combatants[idx].side;

        self.state = BattleState::Resolving;
        let mut summary = ResultSummary::new(self.state);

        match plan.kind {
            ActionKind::Attack => {
                for &target in &plan.targets {
                    let damage = attack_damage(&self.combatants[idx], &self.combatants[target], config);
                    let mut outcome =
                        TargetOutcome::new(self.combatants[target].id, self.combatants[target].hp);
                    outcome.damage = self.combatants[target].take_damage(damage);
                    summary.targets.push(self.finish_target(target, outcome));
                }
            }
            ActionKind::Defend => self.combatants[idx].defending = true,
            ActionKind::Ability => {
                if let Some(ability) = &plan.ability {
                    let user = &mut self.combatants[idx];
                    user.spend_mana(ability.mana_cost);
                    user.start_cooldown(&ability.id, ability.cooldown_turns);
                    summary.mana_spent = ability.mana_cost;

                    for &target in &plan.targets {
                        let outcome = self.apply_ability(idx, target, ability, &env);
                        summary.targets.push(outcome);
                    }
                }
            }
            ActionKind::Flee => {
                self.combatants[idx].fled = true;
                summary.fled = true;
            }
            ActionKind::Skip => {}
        }

        let actor = &mut self.combatants[idx];
        if actor.in_rotation() {
            summary.tick = env.statuses().apply_tick(actor);
            summary.tick.mana_restored = actor.restore_mana(config.mana_regen_per_turn);
        }
        if actor_side == Side::Ally {
            self.ally_turns += 1;
        }

        let turn_number = self.turn_number;
        self.turn_number += 1;
        self.advance(idx);

        summary.state_after = self.state;
        summary.outcome = self.outcome;

        let record = ActionRecord {
            turn_number,
            actor: actor_id,
            kind: plan.kind,
            ability: plan.ability.map(|ability| ability.id),
            target: plan.requested_target,
            automatic,
            summary,
        };
        self.log.push(record.clone());
        record
    }

    fn apply_ability(
        &mut self,
        user: usize,
        target: usize,
        ability: &Ability,
        env: &BattleEnv,
    ) -> TargetOutcome {
        let source = self.combatants[user].id;
        let mut outcome = TargetOutcome::new(self.combatants[target].id, self.combatants[target].hp);

        for effect in &ability.effects {
            if !self.combatants[target].is_alive() {
                break;
            }
            match *effect {
                AbilityEffect::Damage { bonus } => {
                    let damage = ability_damage(
                        &self.combatants[user],
                        &self.combatants[target],
                        bonus,
                        env.config(),
                    );
                    outcome.damage += self.combatants[target].take_damage(damage);
                }
                AbilityEffect::Heal { amount } => {
                    outcome.healed += self.combatants[target].heal(amount);
                }
                AbilityEffect::ApplyStatus(application) => {
                    let result =
                        env.statuses()
                            .apply(&mut self.combatants[target], application, source);
                    outcome.statuses.push(StatusOutcome {
                        kind: application.kind,
                        result,
                    });
                }
            }
        }

        self.finish_target(target, outcome)
    }

    fn finish_target(&self, target: usize, mut outcome: TargetOutcome) -> TargetOutcome {
        let combatant = &self.combatants[target];
        outcome.hp_after = combatant.hp;
        outcome.defeated = !combatant.is_alive();
        outcome
    }
}
