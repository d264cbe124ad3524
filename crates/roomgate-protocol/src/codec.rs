//! Codec trait and implementations for serializing/deserializing messages.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` so one codec can live in the shared server
/// state and be used from every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ```rust
/// use roomgate_protocol::{Action, Codec, Command, JsonCodec};
///
/// let codec = JsonCodec;
/// let cmd = Command::new(Action::Enter, "Ana_1234", "2024-01-01T00:00:00");
/// let bytes = codec.encode(&cmd).unwrap();
/// let decoded: Command = codec.decode(&bytes).unwrap();
/// assert_eq!(cmd, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Command, Response};

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let result: Result<Command, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_truncated_is_decode_error() {
        let result: Result<Command, _> = JsonCodec.decode(br#"{"acao": "entr"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_encode_response_is_compact_json() {
        let bytes = JsonCodec.encode(&Response::success("ok")).unwrap();
        assert_eq!(bytes, br#"{"status":"sucesso","mensagem":"ok"}"#);
    }
}
