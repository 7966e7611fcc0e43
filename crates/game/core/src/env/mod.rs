//! Read-only data shared by every battle.
//!
//! [`BattleEnv`] bundles the validated catalogs, the status registry and the
//! balance config. It is built once at startup and handed to each session as
//! an `Arc`, so sessions never copy or mutate static content.

use crate::ability::{AbilityCatalog, ClassCatalog};
use crate::config::BattleConfig;
use crate::roster::EnemyCatalog;
use crate::status::StatusEffectRegistry;

/// Aggregates the static content the engine, the AI and the reward resolver read.
#[derive(Clone, Debug)]
pub struct BattleEnv {
    config: BattleConfig,
    abilities: AbilityCatalog,
    classes: ClassCatalog,
    enemies: EnemyCatalog,
    statuses: StatusEffectRegistry,
}

impl BattleEnv {
    pub fn new(
        config: BattleConfig,
        abilities: AbilityCatalog,
        classes: ClassCatalog,
        enemies: EnemyCatalog,
        statuses: StatusEffectRegistry,
    ) -> Self {
        Self {
            config,
            abilities,
            classes,
            enemies,
            statuses,
        }
    }

    /// Replaces the balance config, keeping the catalogs.
    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn abilities(&self) -> &AbilityCatalog {
        &self.abilities
    }

    pub fn classes(&self) -> &ClassCatalog {
        &self.classes
    }

    pub fn enemies(&self) -> &EnemyCatalog {
        &self.enemies
    }

    pub fn statuses(&self) -> &StatusEffectRegistry {
        &self.statuses
    }
}
