//! The block-target registry: a bounded, expiring set of account
//! identities awaiting dispatch.
//!
//! Pure data plus eviction logic, no timers, no I/O, no locking. The
//! registry is owned by the session actor and reached from the control
//! API through that actor's command channel, so it never needs to be
//! thread-safe itself.

mod error;
mod registry;

pub use error::RegistryError;
pub use registry::{AddOutcome, RegistryConfig, Target, TargetRegistry};
