//! Content loaders for reading battle data from files.
//!
//! Each loader exposes `load(path)` for files on disk and `parse(text)` for
//! embedded data. Parsing only deserializes; cross-references are checked
//! by the catalog constructors in `battle-core`.

pub mod abilities;
pub mod classes;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod statuses;

pub use abilities::AbilityLoader;
pub use classes::ClassLoader;
pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;
pub use statuses::StatusLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
