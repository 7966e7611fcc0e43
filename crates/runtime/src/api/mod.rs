//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the channel and the workers can stay focused on orchestration.

pub mod errors;
pub mod handle;
pub mod registry;

pub use errors::{Rejection, Result, RuntimeError};
pub use handle::{SessionHandle, Subscription};
pub use registry::SessionRegistry;
