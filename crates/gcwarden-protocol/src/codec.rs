//! Codec trait and implementations for serializing/deserializing payloads.
//!
//! The session layer doesn't care HOW a payload becomes bytes; it just
//! needs something that implements [`Codec`]. [`JsonCodec`] is the default
//! (human-readable, easy to log); a compact binary codec can be slotted in
//! later without touching any other crate.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode payloads to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec lives inside long-running
/// tokio tasks and may be shared across them.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a payload into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a payload.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use gcwarden_protocol::{Codec, JsonCodec, ClientWelcome};
///
/// let codec = JsonCodec;
///
/// let welcome = ClientWelcome {
///     version: 3,
///     game_data2: Some(vec![1, 2, 3]),
/// };
///
/// let bytes = codec.encode(&welcome).unwrap();
/// let decoded: ClientWelcome = codec.decode(&bytes).unwrap();
/// assert_eq!(welcome, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientHello, ConnectionStatus, GcConnectionStatus};

    #[test]
    fn test_empty_hello_round_trips() {
        let codec = JsonCodec;
        let bytes = codec.encode(&ClientHello {}).unwrap();
        let _: ClientHello = codec.decode(&bytes).unwrap();
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let codec = JsonCodec;
        let err = codec.decode::<ConnectionStatus>(b"not json");
        assert!(matches!(err, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let codec = JsonCodec;
        let bytes = codec.encode(&ClientHello {}).unwrap();
        // ConnectionStatus requires a `status` field the hello lacks.
        let err = codec.decode::<ConnectionStatus>(&bytes);
        assert!(err.is_err());
    }

    #[test]
    fn test_status_enum_round_trips() {
        let codec = JsonCodec;
        let status = ConnectionStatus {
            status: GcConnectionStatus::NoSession,
        };
        let bytes = codec.encode(&status).unwrap();
        let decoded: ConnectionStatus = codec.decode(&bytes).unwrap();
        assert_eq!(status, decoded);
    }
}
