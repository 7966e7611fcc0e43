//! Enemy decision making.
//!
//! [`EnemyAi::decide`] is a pure function of an [`AiContext`]: the same
//! combatants, turn number and seed always produce the same action. It can
//! therefore run against a live session or a client-side snapshot.

use crate::ability::{Ability, AbilityEffect, TargetKind};
use crate::action::BattleAction;
use crate::combat::{ability_damage, attack_damage};
use crate::engine::BattleSession;
use crate::env::BattleEnv;
use crate::rng::{PcgRng, RngOracle, compute_seed};
use crate::state::{BattleSnapshot, Combatant, CombatantId};
use crate::status::StatusKind;

/// How an enemy picks its action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyBehavior {
    /// Highest expected damage on the weakest foe; heals itself when low.
    #[default]
    Aggressive,
    /// Weighted random choice between attacking, using an ability and defending.
    Weighted { attack: u32, ability: u32, defend: u32 },
}

/// Read-only view the AI decides from.
#[derive(Clone, Copy, Debug)]
pub struct AiContext<'a> {
    pub combatants: &'a [Combatant],
    pub turn_number: u32,
    pub seed: u64,
    pub env: &'a BattleEnv,
}

impl<'a> AiContext<'a> {
    pub fn from_session(session: &'a BattleSession) -> Self {
        Self {
            combatants: session.combatants(),
            turn_number: session.turn_number(),
            seed: session.seed(),
            env: session.env(),
        }
    }

    pub fn from_snapshot(snapshot: &'a BattleSnapshot, env: &'a BattleEnv) -> Self {
        Self {
            combatants: &snapshot.combatants,
            turn_number: snapshot.turn_number,
            seed: snapshot.seed,
            env,
        }
    }

    fn combatant(&self, id: CombatantId) -> Option<&'a Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    /// Live opponents of `actor`, in roster order.
    fn foes(&self, actor: &Combatant) -> Vec<&'a Combatant> {
        self.combatants
            .iter()
            .filter(|c| c.side != actor.side && c.in_rotation())
            .collect()
    }

    /// Abilities `actor` can use right now, in kit order.
    fn usable(&self, actor: &Combatant) -> Vec<&'a Ability> {
        let env = self.env;
        actor
            .abilities
            .iter()
            .filter_map(|id| env.abilities().get(id.as_str()))
            .filter(|ability| actor.can_use(ability))
            .collect()
    }

    fn roll(&self, actor: CombatantId, context: u32, bound: u32) -> u32 {
        let seed = compute_seed(self.seed, self.turn_number, actor.0, context);
        PcgRng.below(seed, bound)
    }
}

/// Stateless enemy policy.
pub struct EnemyAi;

impl EnemyAi {
    const ROLL_CATEGORY: u32 = 0;
    const ROLL_ABILITY: u32 = 1;
    const ROLL_TARGET: u32 = 2;

    /// Picks an action for `actor`. Falls back to `Defend` when nothing
    /// sensible is possible.
    pub fn decide(ctx: &AiContext<'_>, actor: CombatantId) -> BattleAction {
        let Some(me) = ctx.combatant(actor) else {
            return BattleAction::Defend;
        };
        let foes = ctx.foes(me);
        if foes.is_empty() {
            return BattleAction::Defend;
        }

        match me.behavior.unwrap_or_default() {
            EnemyBehavior::Aggressive => Self::aggressive(ctx, me, &foes),
            EnemyBehavior::Weighted {
                attack,
                ability,
                defend,
            } => Self::weighted(ctx, me, &foes, [attack, ability, defend]),
        }
    }

    fn aggressive(ctx: &AiContext<'_>, me: &Combatant, foes: &[&Combatant]) -> BattleAction {
        let usable = ctx.usable(me);
        let config = ctx.env.config();

        if me.hp_pct() < config.aggressive_heal_threshold_pct {
            let heal = usable.iter().find(|ability| {
                ability.heals()
                    && matches!(ability.target, TargetKind::SelfOnly | TargetKind::SingleAlly)
            });
            if let Some(heal) = heal {
                let target = (heal.target == TargetKind::SingleAlly).then_some(me.id);
                return BattleAction::ability(heal.id.clone(), target);
            }
        }

        let Some(weakest) = foes.iter().copied().min_by_key(|c| (c.hp, c.id)) else {
            return BattleAction::Defend;
        };

        let mut best = BattleAction::attack(weakest.id);
        let mut best_damage = attack_damage(me, weakest, config).min(weakest.hp);

        for ability in usable.iter().filter(|a| a.is_offensive() && a.deals_damage()) {
            let (expected, target) = match ability.target {
                TargetKind::AllEnemies => (
                    foes.iter()
                        .map(|foe| Self::expected_damage(me, foe, ability, ctx.env))
                        .sum::<u32>(),
                    None,
                ),
                _ => (
                    Self::expected_damage(me, weakest, ability, ctx.env),
                    Some(weakest.id),
                ),
            };
            // Basic attack wins ties
            if expected > best_damage {
                best_damage = expected;
                best = BattleAction::ability(ability.id.clone(), target);
            }
        }

        best
    }

    fn weighted(
        ctx: &AiContext<'_>,
        me: &Combatant,
        foes: &[&Combatant],
        weights: [u32; 3],
    ) -> BattleAction {
        let [attack, ability, defend] = weights;
        let total = attack.saturating_add(ability).saturating_add(defend);
        let target = foes[ctx.roll(me.id, Self::ROLL_TARGET, foes.len() as u32) as usize];

        if total == 0 {
            return BattleAction::attack(target.id);
        }

        let roll = ctx.roll(me.id, Self::ROLL_CATEGORY, total);
        if roll < attack {
            return BattleAction::attack(target.id);
        }
        if roll >= attack.saturating_add(ability) {
            return BattleAction::Defend;
        }

        let usable = ctx.usable(me);
        if usable.is_empty() {
            return BattleAction::attack(target.id);
        }
        let pick = usable[ctx.roll(me.id, Self::ROLL_ABILITY, usable.len() as u32) as usize];
        let chosen_target = match pick.target {
            TargetKind::SingleEnemy => Some(Self::status_target(pick, target, foes).id),
            TargetKind::SingleAlly => ctx
                .combatants
                .iter()
                .filter(|c| c.side == me.side && c.in_rotation())
                .min_by_key(|c| (c.hp_pct(), c.id))
                .map(|c| c.id),
            TargetKind::SelfOnly | TargetKind::AllEnemies => None,
        };
        BattleAction::ability(pick.id.clone(), chosen_target)
    }

    /// Keeps `rolled` unless it already carries every harmful status the
    /// ability applies, then prefers the first foe that does not.
    fn status_target<'a>(
        ability: &Ability,
        rolled: &'a Combatant,
        foes: &[&'a Combatant],
    ) -> &'a Combatant {
        let harmful: Vec<StatusKind> = ability
            .effects
            .iter()
            .filter_map(|effect| match effect {
                AbilityEffect::ApplyStatus(application) if application.kind.is_harmful() => {
                    Some(application.kind)
                }
                _ => None,
            })
            .collect();
        let fresh = |foe: &Combatant| harmful.iter().any(|kind| !foe.status.has(*kind));

        if harmful.is_empty() || fresh(rolled) {
            return rolled;
        }
        foes.iter().copied().find(|foe| fresh(foe)).unwrap_or(rolled)
    }

    fn expected_damage(me: &Combatant, foe: &Combatant, ability: &Ability, env: &BattleEnv) -> u32 {
        ability
            .effects
            .iter()
            .map(|effect| match effect {
                AbilityEffect::Damage { bonus } => ability_damage(me, foe, *bonus, env.config()),
                _ => 0,
            })
            .sum::<u32>()
            .min(foe.hp)
    }
}
