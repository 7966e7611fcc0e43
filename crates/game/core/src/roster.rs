//! Party rosters and enemy templates used to populate a battle.

use std::collections::BTreeMap;

use crate::ability::{AbilityCatalog, CatalogError, Class};
use crate::ai::EnemyBehavior;
use crate::state::{AbilityId, CombatantId, PlayerId};

/// One player-controlled party member as supplied by the lobby.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyMember {
    pub id: CombatantId,
    pub name: String,
    pub class: Class,
    pub owner: PlayerId,
}

impl PartyMember {
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        class: Class,
        owner: impl Into<PlayerId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            owner: owner.into(),
        }
    }
}

/// Stat block of one enemy spawned by a template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpec {
    pub name: String,
    pub hp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana: u32,
    pub power: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub behavior: EnemyBehavior,
}

impl EnemySpec {
    pub fn new(name: impl Into<String>, hp: u32, power: u32, armor: u32) -> Self {
        Self {
            name: name.into(),
            hp,
            mana: 0,
            power,
            armor,
            abilities: Vec::new(),
            behavior: EnemyBehavior::default(),
        }
    }

    pub fn with_mana(mut self, mana: u32) -> Self {
        self.mana = mana;
        self
    }

    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.abilities = abilities.into_iter().collect();
        self
    }

    pub fn with_behavior(mut self, behavior: EnemyBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

/// Encounter definition: the enemies to spawn and what beating them is worth.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub enemies: Vec<EnemySpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold: u32,
    /// Ally turns a "clean" victory should take; finishing faster earns a bonus.
    #[cfg_attr(feature = "serde", serde(default))]
    pub par_turns: u32,
}

impl EnemyTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, enemies: Vec<EnemySpec>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enemies,
            xp: 0,
            gold: 0,
            par_turns: 0,
        }
    }

    pub fn with_rewards(mut self, xp: u32, gold: u32, par_turns: u32) -> Self {
        self.xp = xp;
        self.gold = gold;
        self.par_turns = par_turns;
        self
    }
}

/// Read-only table of enemy templates keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyCatalog {
    templates: BTreeMap<String, EnemyTemplate>,
}

impl EnemyCatalog {
    /// Validates templates against the ability catalog.
    pub fn new(
        templates: impl IntoIterator<Item = EnemyTemplate>,
        abilities: &AbilityCatalog,
    ) -> Result<Self, CatalogError> {
        let mut indexed = BTreeMap::new();

        for template in templates {
            if template.enemies.is_empty() {
                return Err(CatalogError::EmptyTemplate {
                    template: template.id,
                });
            }
            for spec in &template.enemies {
                let owner = format!("enemy '{}' in template '{}'", spec.name, template.id);
                if spec.hp == 0 {
                    return Err(CatalogError::ZeroHp { owner });
                }
                abilities.check_kit(&owner, &spec.abilities)?;
            }
            if indexed.contains_key(&template.id) {
                return Err(CatalogError::DuplicateTemplate {
                    template: template.id,
                });
            }
            indexed.insert(template.id.clone(), template);
        }

        Ok(Self { templates: indexed })
    }

    pub fn get(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
