//! Class profile loader.

use std::path::Path;

use battle_core::ClassProfile;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Class profile list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassFile {
    pub classes: Vec<ClassProfile>,
}

/// Loader for class profiles from RON files.
pub struct ClassLoader;

impl ClassLoader {
    /// Load class profiles from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ClassProfile>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ClassProfile>> {
        let file: ClassFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse class profiles RON: {}", e))?;

        Ok(file.classes)
    }
}
