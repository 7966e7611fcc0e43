//! Wire protocol between clients and the runtime.
//!
//! Messages derive serde and encode as internally tagged JSON
//! (`{"type": "perform_action", ...}`), so any transport that can carry text
//! frames can sit in front of [`crate::RealtimeChannel`].

mod messages;

pub use messages::{ClientMessage, DeltaPayload, ServerMessage};
