//! Status stacking rule loader.

use std::path::Path;

use battle_core::StatusRule;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Status rule list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusFile {
    pub rules: Vec<StatusRule>,
}

/// Loader for status stacking rules from RON files.
pub struct StatusLoader;

impl StatusLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<StatusRule>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<StatusRule>> {
        let file: StatusFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status rules RON: {}", e))?;

        Ok(file.rules)
    }
}
