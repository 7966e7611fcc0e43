//! Data-driven battle content and loaders.
//!
//! This crate ships the built-in battle data and provides loaders for RON/TOML files:
//! - Ability catalog (RON)
//! - Class profiles (RON)
//! - Enemy templates (RON)
//! - Status stacking rules (RON)
//! - Balance configuration (TOML)
//!
//! Everything here is read once at startup and folded into a
//! [`battle_core::BattleEnv`]; sessions never touch the files.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ClassLoader, ConfigLoader, ContentFactory, EnemyLoader, LoadResult,
    StatusLoader,
};
