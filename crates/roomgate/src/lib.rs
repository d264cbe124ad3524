//! # Roomgate
//!
//! A TCP service guarding a room with a fixed number of slots, and the
//! worker clients that compete for them.
//!
//! ```text
//! Worker ──TCP──▶ Server accept loop ──▶ connection handler ──▶ room actor
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomgate::prelude::*;
//!
//! # async fn run() -> Result<(), RoomgateError> {
//! let server = Server::builder()
//!     .bind("0.0.0.0:65432")
//!     .room_config(RoomConfig::with_capacity(5))
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod logging;
mod server;

pub use error::RoomgateError;
pub use logging::init_logging;
pub use server::{DEFAULT_BIND_ADDR, DEFAULT_IDLE_TIMEOUT, Server, ServerBuilder};

/// Commonly used types, re-exported from every layer.
pub mod prelude {
    pub use crate::{
        DEFAULT_BIND_ADDR, DEFAULT_IDLE_TIMEOUT, RoomgateError, Server, ServerBuilder,
        init_logging,
    };
    pub use roomgate_protocol::{
        Action, Codec, Command, HistoryEntry, JsonCodec, Response, ResponseStatus, RoomSnapshot,
    };
    pub use roomgate_room::{RoomConfig, RoomError, RoomHandle};
    pub use roomgate_worker::{
        DelayPolicy, FixedDelays, RandomDelays, RequestClient, Simulator, Worker, WorkerConfig,
        WorkerOutcome, WorkerState,
    };
}
