//! Ability catalog loader.

use std::path::Path;

use battle_core::Ability;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Ability list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityFile {
    pub abilities: Vec<Ability>,
}

/// Loader for ability definitions from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load ability definitions from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<Ability>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse ability definitions from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<Ability>> {
        let file: AbilityFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        Ok(file.abilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{AbilityEffect, Class, StatusKind, TargetKind};

    #[test]
    fn parses_tagged_effects_and_optional_fields() {
        let ron = r#"
            #![enable(implicit_some)]
            (
                abilities: [
                    (
                        id: "hex",
                        name: "Hex",
                        class_restriction: Mage,
                        mana_cost: 12,
                        target: SingleEnemy,
                        effects: [
                            Damage(bonus: 1),
                            ApplyStatus((kind: Debuff, magnitude: 3, turns: 2)),
                        ],
                    ),
                    (id: "bite", name: "Bite", mana_cost: 0, target: SingleEnemy, effects: [Damage(bonus: 2)]),
                ],
            )
        "#;

        let abilities = AbilityLoader::parse(ron).unwrap();
        assert_eq!(abilities.len(), 2);

        let hex = &abilities[0];
        assert_eq!(hex.class_restriction, Some(Class::Mage));
        assert_eq!(hex.cooldown_turns, 0);
        assert_eq!(hex.target, TargetKind::SingleEnemy);
        assert!(matches!(
            hex.effects[1],
            AbilityEffect::ApplyStatus(app) if app.kind == StatusKind::Debuff && app.turns == 2
        ));

        assert_eq!(abilities[1].class_restriction, None);
    }

    #[test]
    fn rejects_more_effects_than_an_ability_can_carry() {
        let ron = r#"(abilities: [(
            id: "overload", name: "Overload", mana_cost: 0, target: AllEnemies,
            effects: [Damage(bonus: 1), Damage(bonus: 1), Damage(bonus: 1), Damage(bonus: 1)],
        )])"#;

        assert!(AbilityLoader::parse(ron).is_err());
    }
}
