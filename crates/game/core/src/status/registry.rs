//! Stacking rules and tick resolution for status effects.

use strum::IntoEnumIterator;

use super::{StackPolicy, StatusApplication, StatusEffectInstance, StatusKind};
use crate::ability::CatalogError;
use crate::state::{Combatant, CombatantId};

/// Stacking rule for one status kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusRule {
    pub kind: StatusKind,
    pub stack_policy: StackPolicy,
    /// Upper bound on simultaneous instances when `stack_policy` is `Stack`.
    pub max_stacks: u8,
}

impl StatusRule {
    pub const fn new(kind: StatusKind, stack_policy: StackPolicy, max_stacks: u8) -> Self {
        Self {
            kind,
            stack_policy,
            max_stacks,
        }
    }

    /// Built-in rule for a kind.
    pub const fn default_for(kind: StatusKind) -> Self {
        match kind {
            StatusKind::Poison => Self::new(kind, StackPolicy::Stack, 3),
            StatusKind::Burn => Self::new(kind, StackPolicy::Refresh, 1),
            StatusKind::Freeze => Self::new(kind, StackPolicy::Ignore, 1),
            StatusKind::Buff => Self::new(kind, StackPolicy::Refresh, 1),
            StatusKind::Debuff => Self::new(kind, StackPolicy::Refresh, 1),
        }
    }
}

/// Result of applying a status to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ApplyOutcome {
    /// A new instance was attached.
    Added,
    /// An existing instance had its duration reset.
    Refreshed,
    /// The application was dropped (policy, stack cap or no free slot).
    Ignored,
}

/// Damage dealt by one effect during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickDamage {
    pub kind: StatusKind,
    pub amount: u32,
}

/// Everything that happened to one combatant at its turn boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub damage: Vec<TickDamage>,
    pub expired: Vec<StatusKind>,
    pub mana_restored: u32,
    pub hp_after: u32,
}

impl TickReport {
    pub fn total_damage(&self) -> u32 {
        self.damage.iter().map(|d| d.amount).sum()
    }
}

/// Read-only table of per-kind stacking rules.
///
/// Shared across all sessions; a registry always has exactly one rule per
/// [`StatusKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusEffectRegistry {
    rules: [StatusRule; StatusKind::COUNT],
}

impl StatusEffectRegistry {
    /// Builds a registry from explicit rules.
    ///
    /// Every kind must be declared exactly once and `max_stacks` must be at
    /// least 1.
    pub fn new(rules: impl IntoIterator<Item = StatusRule>) -> Result<Self, CatalogError> {
        let mut table: [Option<StatusRule>; StatusKind::COUNT] = [None; StatusKind::COUNT];

        for rule in rules {
            if rule.max_stacks == 0 {
                return Err(CatalogError::InvalidStatusRule { kind: rule.kind });
            }
            let slot = &mut table[rule.kind.index()];
            if slot.is_some() {
                return Err(CatalogError::DuplicateStatusRule { kind: rule.kind });
            }
            *slot = Some(rule);
        }

        let mut resolved = [StatusRule::default_for(StatusKind::Poison); StatusKind::COUNT];
        for kind in StatusKind::iter() {
            resolved[kind.index()] =
                table[kind.index()].ok_or(CatalogError::MissingStatusRule { kind })?;
        }

        Ok(Self { rules: resolved })
    }

    /// Returns the rule declared for a kind.
    pub fn rule(&self, kind: StatusKind) -> &StatusRule {
        &self.rules[kind.index()]
    }

    /// Iterator over all rules in kind order.
    pub fn rules(&self) -> impl Iterator<Item = &StatusRule> {
        self.rules.iter()
    }

    /// Applies a status to `target` according to the kind's stacking rule.
    pub fn apply(
        &self,
        target: &mut Combatant,
        application: StatusApplication,
        source: CombatantId,
    ) -> ApplyOutcome {
        let rule = self.rule(application.kind);
        let instance = StatusEffectInstance {
            kind: application.kind,
            magnitude: application.magnitude,
            remaining_turns: application.turns,
            stack_policy: rule.stack_policy,
            source,
        };

        let active = target.status.count(application.kind);
        if active == 0 {
            return Self::attach(target, instance);
        }

        match rule.stack_policy {
            StackPolicy::Refresh => match target.status.first_active_mut(application.kind) {
                Some(existing) => {
                    existing.remaining_turns = application.turns;
                    existing.magnitude = application.magnitude;
                    existing.source = source;
                    ApplyOutcome::Refreshed
                }
                None => Self::attach(target, instance),
            },
            StackPolicy::Stack if active < rule.max_stacks as usize => {
                Self::attach(target, instance)
            }
            StackPolicy::Stack | StackPolicy::Ignore => ApplyOutcome::Ignored,
        }
    }

    fn attach(target: &mut Combatant, instance: StatusEffectInstance) -> ApplyOutcome {
        // Purge first so dangling zero-duration entries never block a slot
        target.status.purge_expired();
        if target.status.push(instance) {
            ApplyOutcome::Added
        } else {
            ApplyOutcome::Ignored
        }
    }

    /// Resolves one turn boundary for `combatant`.
    ///
    /// 1. Purges instances already at zero turns
    /// 2. Applies each remaining instance (damage for poison/burn; freeze,
    ///    buff and debuff act through queries rather than at tick time)
    /// 3. Decrements durations and purges what reached zero
    pub fn apply_tick(&self, combatant: &mut Combatant) -> TickReport {
        combatant.status.purge_expired();

        let mut report = TickReport::default();
        let mut damage_total = 0u32;

        for effect in combatant.status.iter_mut() {
            if effect.kind.is_damage_over_time() && effect.magnitude > 0 {
                report.damage.push(TickDamage {
                    kind: effect.kind,
                    amount: effect.magnitude,
                });
                damage_total = damage_total.saturating_add(effect.magnitude);
            }

            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
            if effect.remaining_turns == 0 {
                report.expired.push(effect.kind);
            }
        }

        combatant.status.purge_expired();
        combatant.take_damage(damage_total);
        report.hp_after = combatant.hp;
        report
    }
}

impl Default for StatusEffectRegistry {
    fn default() -> Self {
        Self {
            rules: [
                StatusRule::default_for(StatusKind::Poison),
                StatusRule::default_for(StatusKind::Burn),
                StatusRule::default_for(StatusKind::Freeze),
                StatusRule::default_for(StatusKind::Buff),
                StatusRule::default_for(StatusKind::Debuff),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Side;

    fn dummy(hp: u32) -> Combatant {
        Combatant::new(CombatantId(1), "Dummy", Side::Enemy, hp, 0, 10, 0)
    }

    #[test]
    fn refresh_resets_duration_without_duplicating() {
        let registry = StatusEffectRegistry::default();
        let mut target = dummy(50);

        let burn = StatusApplication::new(StatusKind::Burn, 3, 2);
        assert_eq!(registry.apply(&mut target, burn, CombatantId(0)), ApplyOutcome::Added);
        registry.apply_tick(&mut target);

        let again = StatusApplication::new(StatusKind::Burn, 3, 4);
        assert_eq!(registry.apply(&mut target, again, CombatantId(0)), ApplyOutcome::Refreshed);
        assert_eq!(target.status.count(StatusKind::Burn), 1);
        assert_eq!(target.status.iter().next().unwrap().remaining_turns, 4);
    }

    #[test]
    fn stack_adds_independent_instances_up_to_cap() {
        let registry = StatusEffectRegistry::default();
        let mut target = dummy(50);
        let poison = StatusApplication::new(StatusKind::Poison, 2, 3);

        for _ in 0..3 {
            assert_eq!(registry.apply(&mut target, poison, CombatantId(0)), ApplyOutcome::Added);
        }
        assert_eq!(registry.apply(&mut target, poison, CombatantId(0)), ApplyOutcome::Ignored);
        assert_eq!(target.status.count(StatusKind::Poison), 3);

        let report = registry.apply_tick(&mut target);
        assert_eq!(report.total_damage(), 6);
        assert_eq!(target.hp, 44);
    }

    #[test]
    fn ignore_drops_second_application() {
        let registry = StatusEffectRegistry::default();
        let mut target = dummy(50);
        let freeze = StatusApplication::new(StatusKind::Freeze, 0, 1);

        assert_eq!(registry.apply(&mut target, freeze, CombatantId(0)), ApplyOutcome::Added);
        let longer = StatusApplication::new(StatusKind::Freeze, 0, 5);
        assert_eq!(registry.apply(&mut target, longer, CombatantId(0)), ApplyOutcome::Ignored);
        assert_eq!(target.status.iter().next().unwrap().remaining_turns, 1);
    }

    #[test]
    fn tick_decrements_and_purges_at_zero() {
        let registry = StatusEffectRegistry::default();
        let mut target = dummy(20);
        registry.apply(
            &mut target,
            StatusApplication::new(StatusKind::Poison, 4, 2),
            CombatantId(0),
        );

        let first = registry.apply_tick(&mut target);
        assert_eq!(first.hp_after, 16);
        assert!(first.expired.is_empty());

        let second = registry.apply_tick(&mut target);
        assert_eq!(second.hp_after, 12);
        assert_eq!(second.expired, vec![StatusKind::Poison]);
        assert!(target.status.is_empty());
    }

    #[test]
    fn tick_damage_floors_hp_at_zero() {
        let registry = StatusEffectRegistry::default();
        let mut target = dummy(3);
        registry.apply(
            &mut target,
            StatusApplication::new(StatusKind::Burn, 10, 3),
            CombatantId(0),
        );

        let report = registry.apply_tick(&mut target);
        assert_eq!(report.hp_after, 0);
        assert!(!target.is_alive());
    }

    #[test]
    fn buff_is_a_live_modifier_not_a_tick() {
        let registry = StatusEffectRegistry::default();
        let mut target = dummy(30);
        registry.apply(
            &mut target,
            StatusApplication::new(StatusKind::Buff, 5, 1),
            CombatantId(1),
        );
        assert_eq!(target.effective_power(), 15);

        let report = registry.apply_tick(&mut target);
        assert_eq!(report.total_damage(), 0);
        assert_eq!(target.effective_power(), 10);
    }

    #[test]
    fn registry_requires_every_kind() {
        let rules = vec![StatusRule::default_for(StatusKind::Poison)];
        assert!(matches!(
            StatusEffectRegistry::new(rules),
            Err(CatalogError::MissingStatusRule { .. })
        ));

        let duplicated = StatusKind::iter()
            .map(StatusRule::default_for)
            .chain([StatusRule::default_for(StatusKind::Burn)]);
        assert!(matches!(
            StatusEffectRegistry::new(duplicated),
            Err(CatalogError::DuplicateStatusRule {
                kind: StatusKind::Burn
            })
        ));
    }
}
