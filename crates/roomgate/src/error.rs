//! Unified error type for Roomgate.

use roomgate_protocol::ProtocolError;
use roomgate_room::RoomError;
use roomgate_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// `#[from]` on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum RoomgateError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error.
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let roomgate_err: RoomgateError = TransportError::AcceptFailed(io).into();
        assert!(matches!(roomgate_err, RoomgateError::Transport(_)));
        assert!(roomgate_err.to_string().contains("port taken"));
    }

    #[test]
    fn test_from_protocol_error() {
        let decode = serde_json::from_slice::<u8>(b"x").unwrap_err();
        let roomgate_err: RoomgateError = ProtocolError::Decode(decode).into();
        assert!(matches!(roomgate_err, RoomgateError::Protocol(_)));
        assert!(roomgate_err.to_string().starts_with("decode failed"));
    }

    #[test]
    fn test_from_room_error() {
        let roomgate_err: RoomgateError = RoomError::RoomFull { capacity: 2 }.into();
        assert!(matches!(roomgate_err, RoomgateError::Room(_)));
    }
}
