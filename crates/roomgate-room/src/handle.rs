//! Room actor and the handle used to talk to it.

use roomgate_protocol::RoomSnapshot;
use roomgate_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{Admission, Departure, Room, RoomConfig, RoomError};

/// Command channel size for the room actor.
const CHANNEL_SIZE: usize = 64;

/// Commands sent to the room actor via its channel.
enum RoomCommand {
    Enter {
        id: String,
        connection: ConnectionId,
        reply: oneshot::Sender<Result<Admission, RoomError>>,
    },
    Leave {
        id: String,
        reply: oneshot::Sender<Result<Departure, RoomError>>,
    },
    Status {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    ReleaseConnection {
        connection: ConnectionId,
        reply: oneshot::Sender<Vec<String>>,
    },
    Shutdown,
}

/// A handle to the running room actor.
///
/// Cheap to clone; every connection handler holds one.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomCommand>,
    release_on_disconnect: bool,
}

impl RoomHandle {
    /// Asks for a slot for `id`, entered through `connection`.
    pub async fn enter(
        &self,
        id: impl Into<String>,
        connection: ConnectionId,
    ) -> Result<Admission, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            RoomCommand::Enter {
                id: id.into(),
                connection,
                reply,
            },
            rx,
        )
        .await?
    }

    /// Releases the slot held by `id`.
    pub async fn leave(&self, id: impl Into<String>) -> Result<Departure, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::Leave { id: id.into(), reply }, rx)
            .await?
    }

    /// Reads a consistent snapshot of the room.
    pub async fn status(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::Status { reply }, rx).await
    }

    /// Releases every slot entered through `connection`.
    pub async fn release_connection(
        &self,
        connection: ConnectionId,
    ) -> Result<Vec<String>, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::ReleaseConnection { connection, reply }, rx)
            .await
    }

    /// Whether slots should be released when their connection goes away.
    pub fn release_on_disconnect(&self) -> bool {
        self.release_on_disconnect
    }

    /// Tells the room actor to stop. Later requests fail with
    /// [`RoomError::Unavailable`].
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    async fn request<T>(
        &self,
        cmd: RoomCommand,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable)?;
        rx.await.map_err(|_| RoomError::Unavailable)
    }
}

/// The room actor. Runs inside a Tokio task and is the sole owner of the
/// [`Room`].
struct RoomActor {
    room: Room,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(capacity = self.room.capacity(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Enter {
                    id,
                    connection,
                    reply,
                } => {
                    let _ = reply.send(self.room.enter(&id, connection));
                }
                RoomCommand::Leave { id, reply } => {
                    let _ = reply.send(self.room.leave(&id));
                }
                RoomCommand::Status { reply } => {
                    let _ = reply.send(self.room.status());
                }
                RoomCommand::ReleaseConnection { connection, reply } => {
                    let _ = reply.send(self.room.release_connection(connection));
                }
                RoomCommand::Shutdown => {
                    tracing::info!("room shutting down");
                    break;
                }
            }
        }

        tracing::info!(occupancy = self.room.occupancy(), "room actor stopped");
    }
}

/// Spawns the room actor and returns a handle to it.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_room(config: RoomConfig) -> RoomHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);
    let release_on_disconnect = config.release_on_disconnect;

    let actor = RoomActor {
        room: Room::new(config),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle {
        sender: tx,
        release_on_disconnect,
    }
}
