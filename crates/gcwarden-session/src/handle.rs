//! The control handle: how the HTTP layer (and tests) talk to the
//! session actor.
//!
//! Commands travel over an mpsc channel; replies come back on a oneshot
//! per command. Because the actor processes one command at a time, every
//! registry operation is serialized with link events and pulse ticks:
//! this channel IS the synchronization.

use gcwarden_protocol::AccountId;
use gcwarden_registry::{AddOutcome, RegistryError, Target};
use tokio::sync::{mpsc, oneshot};

use crate::{SessionError, SessionPhase};

/// Commands sent to the session actor through its channel.
pub(crate) enum SessionCommand {
    /// Register a target for blocking.
    AddTarget {
        account: AccountId,
        ttl_secs: u64,
        reply: oneshot::Sender<Result<AddOutcome, RegistryError>>,
    },

    /// Drop a target. Replies whether anything was removed.
    RemoveTarget {
        account: AccountId,
        reply: oneshot::Sender<bool>,
    },

    /// Snapshot the live target list (after eviction).
    ListTargets {
        reply: oneshot::Sender<Vec<Target>>,
    },

    /// Snapshot the session machine's current state.
    Inspect {
        reply: oneshot::Sender<SessionInfo>,
    },
}

/// A snapshot of the session machine (not the registry contents).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionInfo {
    /// Current phase.
    pub phase: SessionPhase,
    /// The learned required version; `None` outside `Ready`.
    pub required_version: Option<u32>,
    /// Our own authenticated identity, once established.
    pub self_account: Option<AccountId>,
    /// Live targets currently registered.
    pub target_count: usize,
}

/// Handle to the running session actor. Cheap to clone: it is just an
/// `mpsc::Sender` wrapper. The HTTP layer holds one per request context.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(sender: mpsc::Sender<SessionCommand>) -> Self {
        Self { sender }
    }

    /// Registers `account` for blocking with a TTL in seconds.
    ///
    /// The inner `Result` carries the registry's verdict (invalid TTL,
    /// capacity, or the add outcome); the outer one fails only if the
    /// actor itself is gone.
    pub async fn add_target(
        &self,
        account: AccountId,
        ttl_secs: u64,
    ) -> Result<Result<AddOutcome, RegistryError>, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::AddTarget {
                account,
                ttl_secs,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Gone)?;
        reply_rx.await.map_err(|_| SessionError::Gone)
    }

    /// Removes `account` from the block list.
    pub async fn remove_target(
        &self,
        account: AccountId,
    ) -> Result<bool, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::RemoveTarget {
                account,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Gone)?;
        reply_rx.await.map_err(|_| SessionError::Gone)
    }

    /// Returns the live target list.
    pub async fn list_targets(&self) -> Result<Vec<Target>, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::ListTargets { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Gone)?;
        reply_rx.await.map_err(|_| SessionError::Gone)
    }

    /// Returns a snapshot of the session machine.
    pub async fn inspect(&self) -> Result<SessionInfo, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Inspect { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Gone)?;
        reply_rx.await.map_err(|_| SessionError::Gone)
    }
}
