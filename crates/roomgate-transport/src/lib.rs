//! Transport abstraction layer for Roomgate.
//!
//! Provides the [`Transport`] and [`Connection`] traits and a plain TCP
//! implementation of both.
//!
//! # Framing
//!
//! There is no length prefix. One `recv` is a single read of at most
//! [`MAX_MESSAGE_SIZE`] bytes and is treated as one whole message, so a
//! peer must write each message in one piece and wait for the reply before
//! sending the next one.

#![allow(async_fn_in_trait)]

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::{TcpConnection, TcpTransport};

use std::fmt;
use std::net::SocketAddr;

/// Upper bound on the size of a single message, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 1024;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Returns the address the transport is listening on.
    fn local_addr(&self) -> Result<SocketAddr, Self::Error>;
}

/// A single connection that can send and receive whole messages.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one message to the remote peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next message from the remote peer.
    ///
    /// Returns `Ok(None)` when the peer closed the connection.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the sending half of the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;

    /// Returns the address of the remote peer.
    fn peer_addr(&self) -> SocketAddr;
}
