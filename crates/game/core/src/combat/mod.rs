//! Combat resolution primitives.
//!
//! Pure functions shared by the session resolver and the enemy AI, so the
//! damage an AI *expects* is exactly the damage the resolver *deals*.

pub mod damage;

pub use damage::{ability_damage, attack_damage, calculate_damage};
