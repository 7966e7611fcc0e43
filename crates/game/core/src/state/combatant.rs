use std::collections::BTreeMap;

use crate::ability::{Ability, Class};
use crate::ai::EnemyBehavior;
use crate::state::{AbilityId, CombatantId, PlayerId};
use crate::status::{StatusEffects, StatusKind};

/// Which team a combatant fights for.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    pub const fn opposing(self) -> Self {
        match self {
            Self::Ally => Self::Enemy,
            Self::Enemy => Self::Ally,
        }
    }
}

/// Runtime state of one battle participant.
///
/// Combatants are created when a battle starts and are mutated only by the
/// owning [`crate::BattleSession`]. A defeated or fled combatant leaves the
/// turn rotation but stays in the list for the log and the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    /// Player class; `None` for enemies.
    pub class: Option<Class>,
    /// Controlling client; `None` for enemies.
    pub owner: Option<PlayerId>,
    /// Enemy template this combatant was spawned from.
    pub template: Option<String>,
    /// Decision policy; `None` for player-controlled combatants.
    pub behavior: Option<EnemyBehavior>,
    pub hp: u32,
    pub hp_max: u32,
    pub mana: u32,
    pub mana_max: u32,
    pub power: u32,
    pub armor: u32,
    pub abilities: Vec<AbilityId>,
    /// Remaining owner turns before an ability can be used again.
    pub cooldowns: BTreeMap<AbilityId, u32>,
    pub status: StatusEffects,
    /// Halves incoming hits until the start of this combatant's next turn.
    pub defending: bool,
    pub fled: bool,
}

impl Combatant {
    /// Creates a combatant at full HP and mana with no abilities.
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        side: Side,
        hp_max: u32,
        mana_max: u32,
        power: u32,
        armor: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            class: None,
            owner: None,
            template: None,
            behavior: None,
            hp: hp_max,
            hp_max,
            mana: mana_max,
            mana_max,
            power,
            armor,
            abilities: Vec::new(),
            cooldowns: BTreeMap::new(),
            status: StatusEffects::empty(),
            defending: false,
            fled: false,
        }
    }

    pub fn with_class(mut self, class: Class, owner: PlayerId) -> Self {
        self.class = Some(class);
        self.owner = Some(owner);
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_behavior(mut self, behavior: EnemyBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.abilities = abilities.into_iter().collect();
        self
    }

    pub fn with_mana(mut self, mana: u32) -> Self {
        self.mana = mana.min(self.mana_max);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Alive and still on the field.
    pub fn in_rotation(&self) -> bool {
        self.is_alive() && !self.fled
    }

    pub fn is_frozen(&self) -> bool {
        self.status.has(StatusKind::Freeze)
    }

    pub fn is_player(&self) -> bool {
        self.side == Side::Ally
    }

    /// Attack power after buff/debuff modifiers.
    pub fn effective_power(&self) -> u32 {
        let buffs = self.status.total_magnitude(StatusKind::Buff);
        let debuffs = self.status.total_magnitude(StatusKind::Debuff);
        self.power.saturating_add(buffs).saturating_sub(debuffs)
    }

    /// Remaining cooldown for an ability (0 when ready).
    pub fn cooldown(&self, ability: &str) -> u32 {
        self.cooldowns.get(ability).copied().unwrap_or(0)
    }

    /// Whether this combatant may use the ability right now, ignoring targets.
    pub fn can_use(&self, ability: &Ability) -> bool {
        self.knows(ability)
            && self.cooldown(ability.id.as_str()) == 0
            && self.mana >= ability.mana_cost
    }

    /// Whether the ability is in this combatant's kit and allowed for its class.
    pub fn knows(&self, ability: &Ability) -> bool {
        self.abilities.iter().any(|id| *id == ability.id)
            && ability
                .class_restriction
                .is_none_or(|class| self.class == Some(class))
    }

    /// HP as a percentage of maximum.
    pub fn hp_pct(&self) -> u32 {
        if self.hp_max == 0 {
            return 0;
        }
        self.hp.saturating_mul(100) / self.hp_max
    }

    /// Removes up to `amount` HP, returning the damage actually taken.
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.hp);
        self.hp -= taken;
        taken
    }

    /// Restores up to `amount` HP without exceeding the maximum.
    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.hp_max.saturating_sub(self.hp));
        self.hp += healed;
        healed
    }

    pub(crate) fn restore_mana(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.mana_max.saturating_sub(self.mana));
        self.mana += restored;
        restored
    }

    pub(crate) fn spend_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_sub(amount);
    }

    pub(crate) fn start_cooldown(&mut self, ability: &AbilityId, turns: u32) {
        if turns > 0 {
            self.cooldowns.insert(ability.clone(), turns);
        }
    }

    /// Counts every cooldown down by one turn, dropping those that reach zero.
    pub(crate) fn tick_cooldowns(&mut self) {
        self.cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_is_clamped_both_ways() {
        let mut c = Combatant::new(CombatantId(1), "Knight", Side::Ally, 50, 10, 10, 2);
        assert_eq!(c.take_damage(80), 50);
        assert_eq!(c.hp, 0);
        assert_eq!(c.heal(500), 50);
        assert_eq!(c.hp, 50);
        assert_eq!(c.heal(5), 0);
    }

    #[test]
    fn cooldowns_count_down_and_clear() {
        let mut c = Combatant::new(CombatantId(1), "Mage", Side::Ally, 30, 40, 5, 0);
        let id = AbilityId::new("fireball");
        c.start_cooldown(&id, 2);
        assert_eq!(c.cooldown("fireball"), 2);
        c.tick_cooldowns();
        assert_eq!(c.cooldown("fireball"), 1);
        c.tick_cooldowns();
        assert_eq!(c.cooldown("fireball"), 0);
        assert!(c.cooldowns.is_empty());
    }

    #[test]
    fn mana_never_exceeds_max() {
        let mut c = Combatant::new(CombatantId(1), "Mage", Side::Ally, 30, 40, 5, 0).with_mana(35);
        assert_eq!(c.restore_mana(10), 5);
        assert_eq!(c.mana, 40);
    }
}
