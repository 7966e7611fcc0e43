use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::{AbilityCatalog, CatalogError, Class};
use crate::state::AbilityId;

/// Base stats and starting kit of a player class.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassProfile {
    pub class: Class,
    pub hp: u32,
    pub mana: u32,
    pub power: u32,
    pub armor: u32,
    pub abilities: Vec<AbilityId>,
}

/// Read-only table of class profiles, one per [`Class`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassCatalog {
    profiles: BTreeMap<Class, ClassProfile>,
}

impl ClassCatalog {
    /// Validates profiles against the ability catalog.
    ///
    /// Every class must have exactly one profile, every kit entry must exist
    /// and be usable by the class.
    pub fn new(
        profiles: impl IntoIterator<Item = ClassProfile>,
        abilities: &AbilityCatalog,
    ) -> Result<Self, CatalogError> {
        let mut indexed = BTreeMap::new();

        for profile in profiles {
            let owner = format!("class {}", profile.class);
            if profile.hp == 0 {
                return Err(CatalogError::ZeroHp { owner });
            }
            abilities.check_kit(&owner, &profile.abilities)?;

            for id in &profile.abilities {
                let restricted = abilities
                    .get(id.as_str())
                    .and_then(|ability| ability.class_restriction);
                if restricted.is_some_and(|class| class != profile.class) {
                    return Err(CatalogError::ClassMismatch {
                        class: profile.class,
                        ability: id.clone(),
                    });
                }
            }

            if indexed.contains_key(&profile.class) {
                return Err(CatalogError::DuplicateClass {
                    class: profile.class,
                });
            }
            indexed.insert(profile.class, profile);
        }

        for class in Class::iter() {
            if !indexed.contains_key(&class) {
                return Err(CatalogError::MissingClass { class });
            }
        }

        Ok(Self { profiles: indexed })
    }

    /// Returns the profile for a class.
    pub fn get(&self, class: Class) -> &ClassProfile {
        // Construction guarantees every class is present
        &self.profiles[&class]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassProfile> {
        self.profiles.values()
    }
}
