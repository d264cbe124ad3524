//! `Server` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → room.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use roomgate_protocol::{Codec, JsonCodec};
use roomgate_room::{RoomConfig, RoomHandle, spawn_room};
use roomgate_transport::{TcpTransport, Transport};

use crate::RoomgateError;
use crate::handler::handle_connection;

/// Address the server binds to unless told otherwise.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:65432";

/// How long a connection may stay silent before it is closed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) room: RoomHandle,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Duration,
}

/// Builder for configuring and starting a [`Server`].
pub struct ServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    idle_timeout: Duration,
}

impl ServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            room_config: RoomConfig::default(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the per-connection idle timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Binds the listener and starts the room actor.
    ///
    /// A bind failure is returned as-is; there is no retry.
    pub async fn build(self) -> Result<Server<JsonCodec>, RoomgateError> {
        let transport = TcpTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            room: spawn_room(self.room_config),
            codec: JsonCodec,
            idle_timeout: self.idle_timeout,
        });

        Ok(Server { transport, state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Roomgate server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server<C: Codec> {
    transport: TcpTransport,
    state: Arc<ServerState<C>>,
}

impl Server<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }
}

impl<C: Codec> Server<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, RoomgateError> {
        Ok(self.transport.local_addr()?)
    }

    /// A handle to the server's room.
    pub fn room(&self) -> RoomHandle {
        self.state.room.clone()
    }

    /// Runs the accept loop until ctrl-c.
    pub async fn run(self) -> Result<(), RoomgateError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Runs the accept loop until `shutdown` completes.
    ///
    /// Every accepted connection gets its own task; there is no limit on
    /// how many run at once. An accept error is logged and ends the loop.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<(), RoomgateError>
    where
        F: Future,
    {
        let addr = self.transport.local_addr()?;
        tracing::info!(%addr, "server started");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(%addr, "server shut down");
                    return Ok(());
                }
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                        return Err(e.into());
                    }
                },
            }
        }
    }
}
