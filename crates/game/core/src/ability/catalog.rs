use std::collections::BTreeMap;

use super::{Ability, AbilityEffect, Class, TargetKind};
use crate::error::{ErrorSeverity, GameError};
use crate::state::AbilityId;
use crate::status::StatusKind;

/// Problems found while validating static content.
///
/// Catalog data is loaded once at startup; any of these is a configuration
/// error that should stop the process, never a per-request condition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("ability '{ability}' is defined more than once")]
    DuplicateAbility { ability: AbilityId },

    #[error("ability '{ability}' has no effects")]
    NoEffects { ability: AbilityId },

    #[error("ability '{ability}' applies {kind} for zero turns")]
    ZeroDurationStatus { ability: AbilityId, kind: StatusKind },

    #[error("ability '{ability}' targets its user but deals damage")]
    SelfTargetedDamage { ability: AbilityId },

    #[error("{owner} references unknown ability '{ability}'")]
    UnknownAbility { owner: String, ability: AbilityId },

    #[error("class {class} cannot use ability '{ability}'")]
    ClassMismatch { class: Class, ability: AbilityId },

    #[error("class {class} is defined more than once")]
    DuplicateClass { class: Class },

    #[error("no profile defined for class {class}")]
    MissingClass { class: Class },

    #[error("status {kind} has no stacking rule")]
    MissingStatusRule { kind: StatusKind },

    #[error("status {kind} has more than one stacking rule")]
    DuplicateStatusRule { kind: StatusKind },

    #[error("status {kind} rule must allow at least one instance")]
    InvalidStatusRule { kind: StatusKind },

    #[error("enemy template '{template}' is defined more than once")]
    DuplicateTemplate { template: String },

    #[error("enemy template '{template}' spawns no enemies")]
    EmptyTemplate { template: String },

    #[error("{owner} has zero maximum HP")]
    ZeroHp { owner: String },
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use CatalogError::*;
        match self {
            DuplicateAbility { .. } => "CATALOG_DUPLICATE_ABILITY",
            NoEffects { .. } => "CATALOG_NO_EFFECTS",
            ZeroDurationStatus { .. } => "CATALOG_ZERO_DURATION_STATUS",
            SelfTargetedDamage { .. } => "CATALOG_SELF_TARGETED_DAMAGE",
            UnknownAbility { .. } => "CATALOG_UNKNOWN_ABILITY",
            ClassMismatch { .. } => "CATALOG_CLASS_MISMATCH",
            DuplicateClass { .. } => "CATALOG_DUPLICATE_CLASS",
            MissingClass { .. } => "CATALOG_MISSING_CLASS",
            MissingStatusRule { .. } => "CATALOG_MISSING_STATUS_RULE",
            DuplicateStatusRule { .. } => "CATALOG_DUPLICATE_STATUS_RULE",
            InvalidStatusRule { .. } => "CATALOG_INVALID_STATUS_RULE",
            DuplicateTemplate { .. } => "CATALOG_DUPLICATE_TEMPLATE",
            EmptyTemplate { .. } => "CATALOG_EMPTY_TEMPLATE",
            ZeroHp { .. } => "CATALOG_ZERO_HP",
        }
    }
}

/// Read-only registry of every ability, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbilityCatalog {
    abilities: BTreeMap<AbilityId, Ability>,
}

impl AbilityCatalog {
    /// Validates and indexes a list of abilities.
    pub fn new(abilities: impl IntoIterator<Item = Ability>) -> Result<Self, CatalogError> {
        let mut indexed = BTreeMap::new();

        for ability in abilities {
            Self::validate(&ability)?;
            if indexed.contains_key(&ability.id) {
                return Err(CatalogError::DuplicateAbility {
                    ability: ability.id,
                });
            }
            indexed.insert(ability.id.clone(), ability);
        }

        Ok(Self { abilities: indexed })
    }

    fn validate(ability: &Ability) -> Result<(), CatalogError> {
        if ability.effects.is_empty() {
            return Err(CatalogError::NoEffects {
                ability: ability.id.clone(),
            });
        }

        for effect in &ability.effects {
            match effect {
                AbilityEffect::Damage { .. } if ability.target == TargetKind::SelfOnly => {
                    return Err(CatalogError::SelfTargetedDamage {
                        ability: ability.id.clone(),
                    });
                }
                AbilityEffect::ApplyStatus(application) if application.turns == 0 => {
                    return Err(CatalogError::ZeroDurationStatus {
                        ability: ability.id.clone(),
                        kind: application.kind,
                    });
                }
                AbilityEffect::Damage { .. }
                | AbilityEffect::Heal { .. }
                | AbilityEffect::ApplyStatus(_) => {}
            }
        }

        Ok(())
    }

    /// Gets an ability by id.
    pub fn get(&self, id: &str) -> Option<&Ability> {
        self.abilities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.abilities.contains_key(id)
    }

    /// Returns an iterator over all abilities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// Checks that every id in `kit` exists, for error reporting on `owner`.
    pub(crate) fn check_kit<'a>(
        &self,
        owner: &str,
        kit: impl IntoIterator<Item = &'a AbilityId>,
    ) -> Result<(), CatalogError> {
        for id in kit {
            if !self.contains(id.as_str()) {
                return Err(CatalogError::UnknownAbility {
                    owner: owner.to_owned(),
                    ability: id.clone(),
                });
            }
        }
        Ok(())
    }
}
