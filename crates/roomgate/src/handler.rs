//! Per-connection handler: read a command, dispatch it to the room, write
//! the response, repeat.
//!
//! The connection closes when the peer closes it, on a transport error, or
//! after `idle_timeout` without a request. An undecodable payload gets an
//! "invalid format" reply and the connection stays open.

use std::sync::Arc;

use roomgate_protocol::{
    Action, Codec, Command, MSG_ENTRY_DENIED, MSG_ENTRY_GRANTED, MSG_EXIT_DENIED,
    MSG_EXIT_RECORDED, MSG_INVALID_COMMAND, MSG_INVALID_FORMAT, ProtocolError, Response,
};
use roomgate_room::{RoomError, RoomHandle};
use roomgate_transport::{Connection, ConnectionId, MAX_MESSAGE_SIZE, TcpConnection};

use crate::RoomgateError;
use crate::server::ServerState;

/// Releases the connection's slots when the handler exits.
///
/// Only armed when the room is configured with `release_on_disconnect`.
/// `Drop` is synchronous, so the release runs as a spawned task.
struct ReleaseGuard {
    connection: ConnectionId,
    room: RoomHandle,
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        let connection = self.connection;
        let room = self.room.clone();
        tokio::spawn(async move {
            match room.release_connection(connection).await {
                Ok(released) if !released.is_empty() => {
                    tracing::info!(%connection, ?released, "released slots of closed connection");
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(%connection, error = %e, "release failed"),
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: TcpConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), RoomgateError> {
    let conn_id = conn.id();
    let peer = conn.peer_addr();
    tracing::debug!(%conn_id, %peer, "handling new connection");

    let _guard = state.room.release_on_disconnect().then(|| ReleaseGuard {
        connection: conn_id,
        room: state.room.clone(),
    });

    loop {
        let data = match tokio::time::timeout(state.idle_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::debug!(%conn_id, %peer, "connection closed by peer");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, %peer, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%conn_id, %peer, timeout = ?state.idle_timeout, "connection timed out");
                break;
            }
        };

        let response = match state.codec.decode::<Command>(&data) {
            Ok(cmd) => dispatch(&state.room, conn_id, cmd).await,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "malformed request");
                Response::error(MSG_INVALID_FORMAT)
            }
        };

        let bytes = encode_reply(&state.codec, response)?;
        conn.send(&bytes).await?;
    }

    let _ = conn.close().await;
    Ok(())
}

/// Applies one command to the room and builds the reply.
async fn dispatch(room: &RoomHandle, conn_id: ConnectionId, cmd: Command) -> Response {
    tracing::debug!(%conn_id, action = %cmd.action, occupant = %cmd.id, sent_at = %cmd.timestamp, "request");

    match cmd.action {
        Action::Enter => match room.enter(cmd.id, conn_id).await {
            Ok(_) => Response::success(MSG_ENTRY_GRANTED),
            Err(RoomError::Unavailable) => Response::error(RoomError::Unavailable.to_string()),
            Err(_) => Response::error(MSG_ENTRY_DENIED),
        },
        Action::Leave => match room.leave(cmd.id).await {
            Ok(_) => Response::success(MSG_EXIT_RECORDED),
            Err(RoomError::Unavailable) => Response::error(RoomError::Unavailable.to_string()),
            Err(_) => Response::error(MSG_EXIT_DENIED),
        },
        Action::Status => match room.status().await {
            Ok(snapshot) => Response::snapshot(snapshot),
            Err(e) => Response::error(e.to_string()),
        },
        Action::Unknown(raw) => {
            tracing::debug!(%conn_id, action = %raw, "unknown action");
            Response::error(MSG_INVALID_COMMAND)
        }
    }
}

/// Encodes `response` so it fits in a single peer read.
///
/// Status replies shed their oldest history entries until they fit. A
/// reply that is still too large (a huge occupant list) is sent as is.
fn encode_reply<C: Codec>(codec: &C, mut response: Response) -> Result<Vec<u8>, ProtocolError> {
    let mut bytes = codec.encode(&response)?;
    let mut dropped = 0;

    while bytes.len() > MAX_MESSAGE_SIZE {
        let Some(data) = response.data.as_mut() else {
            break;
        };
        if data.history.is_empty() {
            break;
        }
        data.history.remove(0);
        dropped += 1;
        bytes = codec.encode(&response)?;
    }

    if dropped > 0 {
        tracing::warn!(dropped, len = bytes.len(), "history trimmed to fit the reply");
    }
    if bytes.len() > MAX_MESSAGE_SIZE {
        tracing::warn!(len = bytes.len(), limit = MAX_MESSAGE_SIZE, "reply exceeds one read");
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use roomgate_protocol::{HistoryEntry, JsonCodec, RoomSnapshot};

    use super::*;

    fn snapshot(id_len: usize) -> Response {
        let id = "x".repeat(id_len);
        Response::snapshot(RoomSnapshot {
            occupancy: 5,
            capacity: 5,
            occupants: vec![id.clone(); 5],
            history: (0..10)
                .map(|i| HistoryEntry {
                    timestamp: "2024-05-01T10:00:00+02:00".into(),
                    event: format!("EXIT {id} 1.{i}s 4/5"),
                })
                .collect(),
        })
    }

    #[test]
    fn test_small_reply_is_untouched() {
        let response = snapshot(13);
        let bytes = encode_reply(&JsonCodec, response.clone()).unwrap();
        assert_eq!(bytes, JsonCodec.encode(&response).unwrap());
    }

    #[test]
    fn test_oversized_status_drops_oldest_history() {
        let bytes = encode_reply(&JsonCodec, snapshot(60)).unwrap();
        assert!(bytes.len() <= MAX_MESSAGE_SIZE);

        let decoded: Response = JsonCodec.decode(&bytes).unwrap();
        let history = decoded.data.unwrap().history;
        assert!(!history.is_empty());
        assert!(history.len() < 10);
        assert!(history.last().unwrap().event.contains(" 1.9s "));
    }

    #[test]
    fn test_plain_reply_passes_through() {
        let bytes = encode_reply(&JsonCodec, Response::success(MSG_ENTRY_GRANTED)).unwrap();
        assert_eq!(bytes, br#"{"status":"sucesso","mensagem":"entry granted"}"#);
    }
}
