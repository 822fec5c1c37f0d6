//! Error types for the protocol layer.
//!
//! Each crate in Gcwarden defines its own error enum. A `ProtocolError`
//! always means the problem is in encoding, decoding, or validating a
//! message, not in the link, the registry, or the session machine.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a payload into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a payload).
    ///
    /// Common causes: truncated payloads, missing required fields,
    /// wrong field types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The raw number is not a valid individual account identity.
    ///
    /// Individual accounts are non-zero 32-bit numbers; zero, negative
    /// input (rejected at parse), and anything above `u32::MAX` land here.
    #[error("{0} is not a valid individual account id")]
    InvalidAccount(u64),

    /// The message is invalid at the protocol level.
    ///
    /// For payloads that decode fine but violate protocol rules, e.g.
    /// a matchmaking start with an empty identity pair.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
