//! Room configuration.

use serde::{Deserialize, Serialize};

use crate::HISTORY_WINDOW;

/// Configuration for the room instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Number of slots. 0 makes a room that rejects every entry.
    pub capacity: usize,

    /// How many history entries are retained in memory. Only the most
    /// recent [`HISTORY_WINDOW`] are ever exposed.
    pub history_retention: usize,

    /// Release every slot a connection entered through when that
    /// connection closes or times out. Off by default: slots are only
    /// freed by an explicit leave.
    ///
    /// Clients that open a fresh connection per request (as the bundled
    /// worker does) lose their slot as soon as the `enter` reply is sent,
    /// so only enable this for clients that keep their connection open.
    pub release_on_disconnect: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            history_retention: 1024,
            release_on_disconnect: false,
        }
    }
}

impl RoomConfig {
    /// A default config with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Fixes out-of-range values so the config is safe to use.
    ///
    /// `history_retention` is raised to at least [`HISTORY_WINDOW`].
    pub fn validated(mut self) -> Self {
        if self.history_retention < HISTORY_WINDOW {
            tracing::warn!(
                retention = self.history_retention,
                min = HISTORY_WINDOW,
                "history_retention below exposed window, raising"
            );
            self.history_retention = HISTORY_WINDOW;
        }
        self
    }
}
