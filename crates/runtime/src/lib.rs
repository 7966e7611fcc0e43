//! Realtime orchestration for server-authoritative battles.
//!
//! This crate wires the deterministic battle core into tokio tasks: one
//! worker per battle owns the [`battle_core::BattleSession`], serializes every
//! command through its queue and broadcasts the resulting deltas to all
//! subscribers. Transports embed [`RealtimeChannel`] and forward
//! [`ClientMessage`]s to it.
//!
//! Modules are organized by responsibility:
//! - [`channel`] hosts the front door that creates sessions and routes messages
//! - [`api`] exposes the handle, registry and error types clients interact with
//! - [`events`] defines the wire protocol
//! - [`config`] holds timeouts and buffer sizes
//! - `workers` keeps the per-session tasks internal to the crate
pub mod api;
pub mod channel;
pub mod config;
pub mod events;

mod workers;

pub use api::{Rejection, Result, RuntimeError, SessionHandle, SessionRegistry, Subscription};
pub use channel::RealtimeChannel;
pub use config::RuntimeConfig;
pub use events::{ClientMessage, DeltaPayload, ServerMessage};
