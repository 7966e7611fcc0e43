//! Worker tasks that back the realtime channel.
//!
//! Each battle runs in its own session worker; the pacer decides when the
//! worker may release the next queued broadcast.

mod pacing;
mod session;

pub(crate) use pacing::{Batch, BroadcastPacer};
pub(crate) use session::{Command, SessionWorker};
