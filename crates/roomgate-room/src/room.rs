//! The admission controller.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use roomgate_protocol::{HistoryEntry, RoomSnapshot, now_timestamp};
use roomgate_transport::ConnectionId;

use crate::{RoomConfig, RoomError};

/// Number of history entries exposed by [`Room::status`].
pub const HISTORY_WINDOW: usize = 10;

/// The record kept for each identifier holding a slot.
#[derive(Debug, Clone, Copy)]
pub struct Occupant {
    /// When the slot was granted.
    pub entry_time: Instant,
    /// The connection the `enter` arrived on.
    pub connection: ConnectionId,
}

/// Result of a granted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Occupied slots after the entry.
    pub occupancy: usize,
    /// Total slots.
    pub capacity: usize,
}

/// Result of a recorded exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    /// How long the occupant held the slot.
    pub dwell: Duration,
    /// Occupied slots after the exit.
    pub occupancy: usize,
    /// Total slots.
    pub capacity: usize,
}

/// Capacity-limited room state.
///
/// The occupants map is the only slot counter: available slots are always
/// `capacity - occupants.len()`, so there is no second count to drift.
#[derive(Debug)]
pub struct Room {
    config: RoomConfig,
    occupants: HashMap<String, Occupant>,
    history: VecDeque<HistoryEntry>,
}

impl Room {
    /// Creates an empty room.
    pub fn new(config: RoomConfig) -> Self {
        let config = config.validated();
        Self {
            occupants: HashMap::with_capacity(config.capacity),
            history: VecDeque::new(),
            config,
        }
    }

    /// Total slots.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Occupied slots.
    pub fn occupancy(&self) -> usize {
        self.occupants.len()
    }

    /// Free slots.
    pub fn available(&self) -> usize {
        self.config.capacity.saturating_sub(self.occupants.len())
    }

    /// Returns `true` if `id` currently holds a slot.
    pub fn contains(&self, id: &str) -> bool {
        self.occupants.contains_key(id)
    }

    /// The record for `id`, if it holds a slot.
    pub fn occupant(&self, id: &str) -> Option<&Occupant> {
        self.occupants.get(id)
    }

    /// Number of retained history entries.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The room's configuration.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Grants `id` a slot.
    ///
    /// A full room is reported before a duplicate identifier.
    pub fn enter(&mut self, id: &str, connection: ConnectionId) -> Result<Admission, RoomError> {
        if self.occupants.len() >= self.config.capacity {
            tracing::debug!(
                occupant = id,
                %connection,
                capacity = self.config.capacity,
                "entry refused: room full"
            );
            return Err(RoomError::RoomFull {
                capacity: self.config.capacity,
            });
        }
        if self.occupants.contains_key(id) {
            tracing::debug!(occupant = id, %connection, "entry refused: already present");
            return Err(RoomError::AlreadyPresent(id.to_string()));
        }

        self.occupants.insert(
            id.to_string(),
            Occupant {
                entry_time: Instant::now(),
                connection,
            },
        );
        let admission = Admission {
            occupancy: self.occupants.len(),
            capacity: self.config.capacity,
        };
        self.record(format!(
            "ENTRY {id} {}/{}",
            admission.occupancy, admission.capacity
        ));
        tracing::info!(
            occupant = id,
            %connection,
            occupancy = admission.occupancy,
            capacity = admission.capacity,
            "entry granted"
        );
        Ok(admission)
    }

    /// Releases the slot held by `id`.
    pub fn leave(&mut self, id: &str) -> Result<Departure, RoomError> {
        let Some(occupant) = self.occupants.remove(id) else {
            tracing::debug!(occupant = id, "exit refused: not in the room");
            return Err(RoomError::NotPresent(id.to_string()));
        };

        let departure = Departure {
            dwell: occupant.entry_time.elapsed(),
            occupancy: self.occupants.len(),
            capacity: self.config.capacity,
        };
        self.record(format!(
            "EXIT {id} {:.1}s {}/{}",
            departure.dwell.as_secs_f64(),
            departure.occupancy,
            departure.capacity
        ));
        tracing::info!(
            occupant = id,
            dwell_secs = departure.dwell.as_secs_f64(),
            occupancy = departure.occupancy,
            capacity = departure.capacity,
            "exit recorded"
        );
        Ok(departure)
    }

    /// Releases every slot that was entered through `connection`.
    ///
    /// Returns the released identifiers, sorted.
    pub fn release_connection(&mut self, connection: ConnectionId) -> Vec<String> {
        let mut released: Vec<String> = self
            .occupants
            .iter()
            .filter(|(_, occ)| occ.connection == connection)
            .map(|(id, _)| id.clone())
            .collect();
        released.sort();

        for id in &released {
            if let Some(occupant) = self.occupants.remove(id) {
                let dwell = occupant.entry_time.elapsed();
                self.record(format!(
                    "RELEASED {id} {:.1}s {}/{}",
                    dwell.as_secs_f64(),
                    self.occupants.len(),
                    self.config.capacity
                ));
                tracing::info!(occupant = %id, %connection, "slot released on disconnect");
            }
        }
        released
    }

    /// A consistent view of the room: occupancy, sorted occupants and the
    /// last [`HISTORY_WINDOW`] history entries, oldest first.
    pub fn status(&self) -> RoomSnapshot {
        let mut occupants: Vec<String> = self.occupants.keys().cloned().collect();
        occupants.sort();

        let skip = self.history.len().saturating_sub(HISTORY_WINDOW);
        RoomSnapshot {
            occupancy: self.occupants.len(),
            capacity: self.config.capacity,
            occupants,
            history: self.history.iter().skip(skip).cloned().collect(),
        }
    }

    fn record(&mut self, event: String) {
        if self.history.len() >= self.config.history_retention {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            timestamp: now_timestamp(),
            event,
        });
    }
}
