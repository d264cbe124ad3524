//! Room admission control for Roomgate.
//!
//! The room is a fixed number of slots shared by every connection. Its
//! state lives in a plain [`Room`] value owned by a single Tokio task (actor
//! model); everything else talks to it through a cloneable [`RoomHandle`].
//! One mailbox means one synchronization domain: enter, leave and status
//! are applied one at a time, so a snapshot never observes a half-applied
//! mutation and two entries can never both win the last slot.
//!
//! # Key types
//!
//! - [`Room`]: occupants, history and the admission rules
//! - [`RoomHandle`]: send requests to the running room actor
//! - [`RoomConfig`]: capacity and retention settings

mod config;
mod error;
mod handle;
mod room;

pub use config::RoomConfig;
pub use error::RoomError;
pub use handle::{RoomHandle, spawn_room};
pub use room::{Admission, Departure, HISTORY_WINDOW, Occupant, Room};
