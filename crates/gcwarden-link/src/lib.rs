//! Coordinator link boundary for Gcwarden.
//!
//! The link is the external collaborator that owns authentication,
//! encryption, and transport to the remote service. Gcwarden never
//! implements it; it *consumes* it through the [`CoordinatorLink`] trait
//! for outbound calls and the [`LinkEvent`] stream for everything inbound.
//!
//! A concrete implementation (a real client library binding, or the
//! loopback used by the demo and tests) logs on before the session actor
//! starts; from then on the actor reacts purely to events.

mod error;

pub use error::LinkError;

use std::future::Future;

use gcwarden_protocol::{AccountId, AppId, MsgType};
use tokio::sync::mpsc;

/// Outbound operations on an authenticated coordinator link.
///
/// Methods are declared `impl Future + Send` (rather than `async fn`) so
/// the session actor can be spawned onto a multi-threaded runtime while
/// generic over the link; implementations can still just write `async fn`.
pub trait CoordinatorLink: Send + Sync + 'static {
    /// Requests a usage license for the application.
    ///
    /// Best-effort: the session layer logs a failure and continues, so
    /// implementations may fail freely here.
    fn request_license(
        &self,
        app: AppId,
    ) -> impl Future<Output = Result<(), LinkError>> + Send;

    /// Declares the application as currently being played, which routes
    /// coordinator traffic for that application to this session.
    fn declare_playing(
        &self,
        app: AppId,
    ) -> impl Future<Output = Result<(), LinkError>> + Send;

    /// Sends one tagged payload to the coordinator.
    fn send(
        &self,
        app: AppId,
        msg_type: MsgType,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), LinkError>> + Send;
}

/// Everything the link pushes at the session state machine.
#[derive(Debug)]
pub enum LinkEvent {
    /// The link finished logon; `account` is our own identity.
    ///
    /// Also delivered again after the link's internal reconnect logic
    /// restores a dropped connection.
    Authenticated { account: AccountId },

    /// A tagged coordinator payload arrived.
    Message {
        app: AppId,
        msg_type: MsgType,
        payload: Vec<u8>,
    },

    /// The connection dropped. The link retries on its own; the session
    /// layer just stops its timers and waits for `Authenticated`.
    Disconnected,

    /// The link hit an error it cannot safely retry in-process.
    /// Terminal for the whole process, not just the session.
    Fatal(LinkError),
}

/// The receiving half of a link's event stream, handed to the session
/// actor at startup.
pub type LinkEvents = mpsc::Receiver<LinkEvent>;

/// The sending half, kept by the link implementation.
pub type LinkEventSender = mpsc::Sender<LinkEvent>;

/// Creates a link event channel with a sane default depth.
pub fn event_channel() -> (LinkEventSender, LinkEvents) {
    mpsc::channel(64)
}
