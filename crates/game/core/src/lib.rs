//! Deterministic battle rules shared by the server runtime and tools.
//!
//! `battle-core` defines the canonical combat rules (status effects, ability
//! catalog, combatants, the battle state machine, enemy AI and rewards) and
//! exposes pure, synchronous APIs. All state mutation flows through
//! [`BattleSession`]; the runtime crate wraps it in an async actor.
pub mod ability;
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod reward;
pub mod rng;
pub mod roster;
pub mod state;
pub mod status;

pub use ability::{
    Ability, AbilityCatalog, AbilityEffect, AbilityEffects, CatalogError, Class, ClassCatalog,
    ClassProfile, TargetKind,
};
pub use action::{
    ActionKind, ActionRecord, BattleAction, BattleError, InvalidTargetReason, ResultSummary,
    StatusOutcome, TargetOutcome,
};
pub use ai::{AiContext, EnemyAi, EnemyBehavior};
pub use config::BattleConfig;
pub use engine::{BattleSession, SetupError};
pub use env::BattleEnv;
pub use error::{ErrorSeverity, GameError};
pub use reward::{RewardRecord, RewardResolver};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use roster::{EnemyCatalog, EnemySpec, EnemyTemplate, PartyMember};
pub use state::{
    AbilityId, BattleOutcome, BattleSnapshot, BattleState, Combatant, CombatantChanges,
    CombatantFields, CombatantId, PlayerId, SessionId, Side, SnapshotDiff,
};
pub use status::{
    ApplyOutcome, StackPolicy, StatusApplication, StatusEffectInstance, StatusEffectRegistry,
    StatusEffects, StatusKind, StatusRule, TickDamage, TickReport,
};
