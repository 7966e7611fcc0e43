//! Damage calculation.

use crate::config::BattleConfig;
use crate::state::Combatant;

/// Calculate the damage of one hit.
///
/// # Formula
///
/// ```text
/// raw = power - armor                      (saturating)
/// hit = max(raw, min_damage)
///
/// if defending:
///     hit = max(hit / defend_divisor, min_damage)
/// ```
pub fn calculate_damage(power: u32, armor: u32, defending: bool, config: &BattleConfig) -> u32 {
    let hit = power.saturating_sub(armor).max(config.min_damage);

    if defending {
        (hit / config.defend_divisor.max(1)).max(config.min_damage)
    } else {
        hit
    }
}

/// Damage of a basic attack from `attacker` on `defender`.
pub fn attack_damage(attacker: &Combatant, defender: &Combatant, config: &BattleConfig) -> u32 {
    calculate_damage(
        attacker.effective_power(),
        defender.armor,
        defender.defending,
        config,
    )
}

/// Damage of an ability `Damage { bonus }` effect.
pub fn ability_damage(
    attacker: &Combatant,
    defender: &Combatant,
    bonus: u32,
    config: &BattleConfig,
) -> u32 {
    calculate_damage(
        attacker.effective_power().saturating_add(bonus),
        defender.armor,
        defender.defending,
        config,
    )
}
