//! Typed coordinator payloads and their numeric message tags.
//!
//! Each outbound or inbound coordinator message is a `(MsgType, bytes)`
//! pair; the structs here are what those bytes decode to. The tag values
//! are stable protocol constants; they must never change, or the remote
//! side will route the payload to the wrong schema.

use serde::{Deserialize, Serialize};

use crate::{AccountId, MsgType};

// ---------------------------------------------------------------------------
// Message tags
// ---------------------------------------------------------------------------

/// Coordinator → client: session welcome, carries the embedded
/// matchmaking hello ([`ClientWelcome`]).
pub const MSG_CLIENT_WELCOME: MsgType = MsgType(4004);

/// Client → coordinator: stateless session request ([`ClientHello`]).
pub const MSG_CLIENT_HELLO: MsgType = MsgType(4006);

/// Coordinator → client: session liveness report ([`ConnectionStatus`]).
pub const MSG_CONNECTION_STATUS: MsgType = MsgType(4009);

/// Client → coordinator: start a matchmaking search for a pair of
/// accounts ([`MatchmakingStart`]).
pub const MSG_MATCHMAKING_START: MsgType = MsgType(9152);

/// The fixed matchmaking mode tag carried by every block dispatch.
pub const BLOCK_GAME_TYPE: u32 = 519;

// ---------------------------------------------------------------------------
// Handshake messages
// ---------------------------------------------------------------------------

/// The client hello. Carries no fields; sending it at all is the request.
///
/// Sent on a ~1 s cadence until the coordinator answers with a welcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientHello {}

/// The coordinator's welcome, ending the hello phase.
///
/// `game_data2` is an *embedded* payload: raw bytes that decode to a
/// [`MatchmakingHello`]. The coordinator may omit it; a welcome without it
/// is a protocol anomaly the session layer logs and survives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientWelcome {
    /// Coordinator build version (informational).
    #[serde(default)]
    pub version: u32,
    /// Embedded matchmaking sub-payload, absent on anomalous welcomes.
    #[serde(default)]
    pub game_data2: Option<Vec<u8>>,
}

/// The matchmaking hello embedded in a [`ClientWelcome`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchmakingHello {
    /// Global matchmaking statistics published by the coordinator.
    pub global_stats: GlobalStats,
}

/// Global matchmaking stats. Only the required version matters to us.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    /// The client version every subsequent matchmaking message must echo.
    pub required_version: u32,
}

// ---------------------------------------------------------------------------
// Connection status
// ---------------------------------------------------------------------------

/// The coordinator's view of our sub-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GcConnectionStatus {
    /// The coordinator holds an active session for us.
    HaveSession,
    /// The coordinator is shutting down.
    GoingDown,
    /// No session; a new hello handshake is required.
    NoSession,
    /// No session; we are queued behind a logon surge.
    NoSessionInLogonQueue,
    /// The underlying service is unreachable from the coordinator.
    NoService,
}

impl GcConnectionStatus {
    /// Whether the coordinator still holds an active session for us.
    pub fn has_session(self) -> bool {
        matches!(self, Self::HaveSession)
    }
}

/// Coordinator → client liveness report.
///
/// Anything other than [`GcConnectionStatus::HaveSession`] means the
/// session machine must fall back to the hello handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: GcConnectionStatus,
}

// ---------------------------------------------------------------------------
// Matchmaking start (the block message)
// ---------------------------------------------------------------------------

/// The outbound block message: asks the coordinator to start a matchmaking
/// search pairing our own account with a target account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchmakingStart {
    /// Echo of the coordinator's required version; stale values are
    /// rejected remotely.
    pub client_version: u32,
    /// Matchmaking mode tag; always [`BLOCK_GAME_TYPE`] for dispatches.
    pub game_type: u32,
    /// The identity pair: `[self, target]`.
    pub account_ids: Vec<AccountId>,
}

impl MatchmakingStart {
    /// Builds a block dispatch for one target.
    pub fn block(version: u32, own: AccountId, target: AccountId) -> Self {
        Self {
            client_version: version,
            game_type: BLOCK_GAME_TYPE,
            account_ids: vec![own, target],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_stable() {
        assert_eq!(MSG_CLIENT_WELCOME, MsgType(4004));
        assert_eq!(MSG_CLIENT_HELLO, MsgType(4006));
        assert_eq!(MSG_CONNECTION_STATUS, MsgType(4009));
        assert_eq!(MSG_MATCHMAKING_START, MsgType(9152));
        assert_eq!(BLOCK_GAME_TYPE, 519);
    }

    #[test]
    fn test_block_builder_pairs_self_then_target() {
        let own = AccountId::from_individual(1).unwrap();
        let target = AccountId::from_individual(2).unwrap();
        let msg = MatchmakingStart::block(13901, own, target);
        assert_eq!(msg.client_version, 13901);
        assert_eq!(msg.game_type, BLOCK_GAME_TYPE);
        assert_eq!(msg.account_ids, vec![own, target]);
    }

    #[test]
    fn test_connection_status_has_session() {
        assert!(GcConnectionStatus::HaveSession.has_session());
        assert!(!GcConnectionStatus::NoSession.has_session());
        assert!(!GcConnectionStatus::GoingDown.has_session());
        assert!(!GcConnectionStatus::NoSessionInLogonQueue.has_session());
        assert!(!GcConnectionStatus::NoService.has_session());
    }
}
