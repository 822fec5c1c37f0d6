//! The core of Gcwarden: the coordinator session state machine and the
//! block dispatch loop.
//!
//! Everything stateful lives inside one actor task ([`spawn`]): the
//! session phase, the learned required version, our own identity, the
//! target registry, and the two pulses (hello ~1 s, dispatch ~2.5 s).
//! The actor's `tokio::select!` loop serializes the three concurrent
//! contexts (link events, pulse ticks, and control commands), so no
//! observer can ever see a half-applied transition or a stale timer
//! firing after one.

mod actor;
mod error;
mod handle;
mod phase;

pub use actor::{spawn, SessionConfig};
pub use error::SessionError;
pub use handle::{SessionHandle, SessionInfo};
pub use phase::SessionPhase;
