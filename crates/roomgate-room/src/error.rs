//! Error types for the room layer.

/// Why a room operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// Every slot is taken.
    #[error("room is full ({capacity} of {capacity} slots taken)")]
    RoomFull {
        /// The room's capacity.
        capacity: usize,
    },

    /// The identifier already holds a slot.
    #[error("{0} is already in the room")]
    AlreadyPresent(String),

    /// The identifier does not hold a slot.
    #[error("{0} is not in the room")]
    NotPresent(String),

    /// The room actor has stopped or its mailbox is closed.
    #[error("room is unavailable")]
    Unavailable,
}
