//! The session phase state machine.

/// Where the coordinator session currently stands.
///
/// ```text
/// Disconnected → Connected → AwaitingWelcome → Ready
///       ↑            ↑                           │
///       │            └────(no active session)────┘
///       └──────────(link loss, from any phase)
/// ```
///
/// - **Disconnected**: no authenticated link. Nothing runs.
/// - **Connected**: link is up, hello pulse armed, no hello sent yet.
/// - **AwaitingWelcome**: at least one hello is out; still waiting for
///   the coordinator's welcome. Hellos keep repeating.
/// - **Ready**: welcome received, required version learned, dispatch
///   pulse armed.
///
/// The learned required version is only meaningful in `Ready`; every
/// transition out of `Ready` invalidates it until relearned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Disconnected,
    Connected,
    AwaitingWelcome,
    Ready,
}

impl SessionPhase {
    /// Returns `true` if block dispatch is allowed.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns `true` while the hello handshake is in flight.
    pub fn is_handshaking(&self) -> bool {
        matches!(self, Self::Connected | Self::AwaitingWelcome)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected => write!(f, "Connected"),
            Self::AwaitingWelcome => write!(f, "AwaitingWelcome"),
            Self::Ready => write!(f, "Ready"),
        }
    }
}
