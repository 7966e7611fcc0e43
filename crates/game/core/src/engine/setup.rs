use std::collections::BTreeSet;

use crate::env::BattleEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::roster::{EnemyTemplate, PartyMember};
use crate::state::{Combatant, CombatantId, Side};

/// Errors raised while creating a battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("a battle needs at least one party member")]
    NoAllies,

    #[error("enemy template '{template}' spawns no enemies")]
    NoEnemies { template: String },

    #[error("combatant id {id} appears more than once")]
    DuplicateCombatant { id: CombatantId },

    #[error("unknown enemy template '{template}'")]
    UnknownTemplate { template: String },

    #[error("no combatant ids left after {highest} for {enemies} enemies")]
    IdSpaceExhausted { highest: CombatantId, enemies: usize },
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoAllies => "SETUP_NO_ALLIES",
            Self::NoEnemies { .. } => "SETUP_NO_ENEMIES",
            Self::DuplicateCombatant { .. } => "SETUP_DUPLICATE_COMBATANT",
            Self::UnknownTemplate { .. } => "SETUP_UNKNOWN_TEMPLATE",
            Self::IdSpaceExhausted { .. } => "SETUP_ID_SPACE_EXHAUSTED",
        }
    }
}

/// Builds the ordered combatant list: party in roster order, then enemies in
/// template order with ids allocated after the highest party id.
pub(super) fn spawn_combatants(
    roster: &[PartyMember],
    template: &EnemyTemplate,
    env: &BattleEnv,
) -> Result<Vec<Combatant>, SetupError> {
    if roster.is_empty() {
        return Err(SetupError::NoAllies);
    }
    if template.enemies.is_empty() {
        return Err(SetupError::NoEnemies {
            template: template.id.clone(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut combatants = Vec::with_capacity(roster.len() + template.enemies.len());

    for member in roster {
        if !seen.insert(member.id) {
            return Err(SetupError::DuplicateCombatant { id: member.id });
        }
        let profile = env.classes().get(member.class);
        combatants.push(
            Combatant::new(
                member.id,
                member.name.clone(),
                Side::Ally,
                profile.hp,
                profile.mana,
                profile.power,
                profile.armor,
            )
            .with_class(member.class, member.owner.clone())
            .with_abilities(profile.abilities.iter().cloned()),
        );
    }

    let highest = seen.last().copied().unwrap_or(CombatantId(0));
    for (offset, spec) in template.enemies.iter().enumerate() {
        let id = u32::try_from(offset)
            .ok()
            .and_then(|offset| highest.0.checked_add(offset)?.checked_add(1))
            .map(CombatantId)
            .ok_or_else(|| SetupError::IdSpaceExhausted {
                highest,
                enemies: template.enemies.len(),
            })?;
        combatants.push(
            Combatant::new(
                id,
                spec.name.clone(),
                Side::Enemy,
                spec.hp,
                spec.mana,
                spec.power,
                spec.armor,
            )
            .with_template(template.id.clone())
            .with_behavior(spec.behavior)
            .with_abilities(spec.abilities.iter().cloned()),
        );
    }

    Ok(combatants)
}
