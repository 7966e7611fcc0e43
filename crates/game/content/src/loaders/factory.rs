//! Content factory for building the battle environment from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use battle_core::{
    AbilityCatalog, BattleConfig, BattleEnv, ClassCatalog, EnemyCatalog, StatusEffectRegistry,
};

use crate::loaders::{
    AbilityLoader, ClassLoader, ConfigLoader, EnemyLoader, LoadResult, StatusLoader,
};

const BUILTIN_ABILITIES: &str = include_str!("../../data/abilities.ron");
const BUILTIN_CLASSES: &str = include_str!("../../data/classes.ron");
const BUILTIN_ENEMIES: &str = include_str!("../../data/enemies.ron");
const BUILTIN_STATUSES: &str = include_str!("../../data/statuses.ron");
const BUILTIN_CONFIG: &str = include_str!("../../data/battle.toml");

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml     (optional, defaults apply when absent)
/// ├── abilities.ron
/// ├── classes.ron
/// ├── enemies.ron
/// └── statuses.ron    (optional, built-in stacking rules when absent)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Builds the environment from the data compiled into this crate.
    pub fn builtin() -> LoadResult<BattleEnv> {
        let config = ConfigLoader::parse(BUILTIN_CONFIG)?;
        let abilities = AbilityCatalog::new(AbilityLoader::parse(BUILTIN_ABILITIES)?)
            .context("built-in ability catalog is invalid")?;
        let classes = ClassCatalog::new(ClassLoader::parse(BUILTIN_CLASSES)?, &abilities)
            .context("built-in class profiles are invalid")?;
        let enemies = EnemyCatalog::new(EnemyLoader::parse(BUILTIN_ENEMIES)?, &abilities)
            .context("built-in enemy templates are invalid")?;
        let statuses = StatusEffectRegistry::new(StatusLoader::parse(BUILTIN_STATUSES)?)
            .context("built-in status rules are invalid")?;

        Ok(BattleEnv::new(config, abilities, classes, enemies, statuses))
    }

    /// Load balance configuration from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("battle.toml");
        if !path.exists() {
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load and validate the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<AbilityCatalog> {
        let path = self.data_dir.join("abilities.ron");
        let abilities = AbilityLoader::load(&path)?;
        AbilityCatalog::new(abilities).with_context(|| format!("invalid {}", path.display()))
    }

    /// Load class profiles from `classes.ron`, checked against `abilities`.
    pub fn load_classes(&self, abilities: &AbilityCatalog) -> LoadResult<ClassCatalog> {
        let path = self.data_dir.join("classes.ron");
        let profiles = ClassLoader::load(&path)?;
        ClassCatalog::new(profiles, abilities)
            .with_context(|| format!("invalid {}", path.display()))
    }

    /// Load enemy templates from `enemies.ron`, checked against `abilities`.
    pub fn load_enemies(&self, abilities: &AbilityCatalog) -> LoadResult<EnemyCatalog> {
        let path = self.data_dir.join("enemies.ron");
        let templates = EnemyLoader::load(&path)?;
        EnemyCatalog::new(templates, abilities)
            .with_context(|| format!("invalid {}", path.display()))
    }

    /// Load status stacking rules from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<StatusEffectRegistry> {
        let path = self.data_dir.join("statuses.ron");
        if !path.exists() {
            return Ok(StatusEffectRegistry::default());
        }
        let rules = StatusLoader::load(&path)?;
        StatusEffectRegistry::new(rules).with_context(|| format!("invalid {}", path.display()))
    }

    /// Load every file and assemble the shared environment.
    pub fn load_env(&self) -> LoadResult<BattleEnv> {
        let config = self.load_config()?;
        let abilities = self.load_abilities()?;
        let classes = self.load_classes(&abilities)?;
        let enemies = self.load_enemies(&abilities)?;
        let statuses = self.load_statuses()?;

        Ok(BattleEnv::new(config, abilities, classes, enemies, statuses))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn builtin_content_is_valid() {
        let env = ContentFactory::builtin().unwrap();
        assert!(env.abilities().contains("fireball"));
        assert_eq!(env.classes().iter().count(), 4);
        assert!(env.enemies().get("goblin_scouts").is_some());
        assert_eq!(env.config(), &BattleConfig::default());
    }
}
