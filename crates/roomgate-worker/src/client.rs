//! One-shot request client: one connection, one command, one response.

use std::time::Duration;

use roomgate_protocol::{Action, Codec, Command, JsonCodec, ProtocolError, Response};
use roomgate_transport::{Connection, TcpConnection, TransportError};

/// Why a request produced no server response.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Connecting, writing or reading failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The command could not be encoded or the reply could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The exchange did not finish within the request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server closed the connection without replying.
    #[error("server closed the connection without replying")]
    NoReply,
}

/// Sends single commands to the server, each on a fresh connection.
#[derive(Debug, Clone)]
pub struct RequestClient {
    addr: String,
    timeout: Duration,
    codec: JsonCodec,
}

impl RequestClient {
    /// Creates a client for the server at `addr` (`host:port`).
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            codec: JsonCodec,
        }
    }

    /// The server address.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Sends `action` for `id` and returns the server's reply.
    ///
    /// Transport failures, timeouts and undecodable replies come back as
    /// an error [`Response`] describing the failure, so callers handle
    /// every outcome the same way.
    pub async fn send(&self, action: Action, id: &str) -> Response {
        match self.try_send(Command::now(action, id)).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(addr = %self.addr, occupant = id, error = %e, "request failed");
                Response::error(e.to_string())
            }
        }
    }

    /// Sends `command` and waits for one reply.
    pub async fn try_send(&self, command: Command) -> Result<Response, RequestError> {
        match tokio::time::timeout(self.timeout, self.exchange(&command)).await {
            Ok(result) => result,
            Err(_) => Err(RequestError::Timeout(self.timeout)),
        }
    }

    async fn exchange(&self, command: &Command) -> Result<Response, RequestError> {
        let conn = TcpConnection::connect(self.addr.as_str()).await?;
        let bytes = self.codec.encode(command)?;
        conn.send(&bytes).await?;

        let reply = conn.recv().await?.ok_or(RequestError::NoReply)?;
        // Best effort: the reply is already in hand.
        let _ = conn.close().await;
        Ok(self.codec.decode(&reply)?)
    }
}
