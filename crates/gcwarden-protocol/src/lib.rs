//! Coordinator wire protocol for Gcwarden.
//!
//! This crate defines the "language" spoken with the game coordinator:
//!
//! - **Types** ([`AccountId`], [`AppId`], [`MsgType`]), the identity and
//!   tag newtypes every layer above agrees on.
//! - **Messages** ([`ClientHello`], [`ClientWelcome`], [`ConnectionStatus`],
//!   [`MatchmakingStart`], …), the typed payloads that travel behind a
//!   numeric message tag.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]), how payloads are converted
//!   to/from bytes.
//! - **Errors** ([`ProtocolError`]), what can go wrong while doing so.
//!
//! # Architecture
//!
//! The protocol layer sits between the coordinator link (opaque tagged
//! bytes) and the session state machine (what those bytes mean). It knows
//! nothing about connections, timers, or the target registry.
//!
//! ```text
//! Link (tag + bytes) → Protocol (typed payload) → Session (state machine)
//! ```

mod codec;
mod error;
mod messages;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use messages::{
    ClientHello, ClientWelcome, ConnectionStatus, GcConnectionStatus,
    GlobalStats, MatchmakingHello, MatchmakingStart, BLOCK_GAME_TYPE,
    MSG_CLIENT_HELLO, MSG_CLIENT_WELCOME, MSG_CONNECTION_STATUS,
    MSG_MATCHMAKING_START,
};
pub use types::{AccountId, AppId, MsgType};
