//! Enemy template loader.

use std::path::Path;

use battle_core::EnemyTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Enemy template list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyFile {
    pub templates: Vec<EnemyTemplate>,
}

/// Loader for enemy templates from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load enemy templates from a RON file.
    ///
    /// Omitted enemy fields (`mana`, `armor`, `abilities`, `behavior`) take
    /// their defaults, so a plain brawler needs only name, HP and power.
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EnemyTemplate>> {
        let file: EnemyFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy templates RON: {}", e))?;

        Ok(file.templates)
    }
}
