//! Error types for the session layer.

use gcwarden_link::LinkError;

/// Errors that can end the session actor or a control call.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The link reported an unrecoverable error. The actor's run loop
    /// returns this and the process is expected to exit; an external
    /// supervisor restarting it is the recovery mechanism.
    #[error("coordinator link failed fatally: {0}")]
    LinkFatal(LinkError),

    /// The session actor is no longer running, so a control command
    /// could not be delivered or answered.
    #[error("session actor is gone")]
    Gone,
}
