//! A single worker and its enter / dwell / leave run.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use roomgate_protocol::Action;

use crate::{DelayPolicy, RequestClient, WorkerConfig};

/// Where a worker stands relative to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Not holding a slot. Initial state, and the state after a recorded
    /// leave.
    NotInRoom,
    /// Holding a slot. Terminal only if the leave request failed.
    InRoom,
    /// Every entry attempt failed.
    GaveUp,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInRoom => write!(f, "NotInRoom"),
            Self::InRoom => write!(f, "InRoom"),
            Self::GaveUp => write!(f, "GaveUp"),
        }
    }
}

/// Summary of one worker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    /// The worker's occupant identifier.
    pub id: String,
    /// Entry attempts made.
    pub attempts: u32,
    /// Whether an entry was ever granted.
    pub entered: bool,
    /// State at the end of the run.
    pub state: WorkerState,
}

/// An independent client actor competing for a room slot.
pub struct Worker<D: DelayPolicy> {
    name: String,
    id: String,
    client: RequestClient,
    max_attempts: u32,
    delays: Arc<D>,
    state: WorkerState,
}

impl<D: DelayPolicy> Worker<D> {
    /// Creates a worker named `name` with a random `{name}_NNNN` id.
    pub fn new(name: impl Into<String>, config: &WorkerConfig, delays: Arc<D>) -> Self {
        let name = name.into();
        let id = format!("{name}_{}", rand::rng().random_range(1000..=9999));
        Self::with_id(name, id, config, delays)
    }

    /// Creates a worker with an explicit occupant id.
    pub fn with_id(
        name: impl Into<String>,
        id: impl Into<String>,
        config: &WorkerConfig,
        delays: Arc<D>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            client: RequestClient::new(config.addr(), config.request_timeout),
            max_attempts: config.max_attempts,
            delays,
            state: WorkerState::NotInRoom,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Occupant identifier sent to the server.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current state.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Tries to enter up to `max_attempts` times, dwells, then leaves.
    pub async fn run(mut self) -> WorkerOutcome {
        let mut attempts = 0;
        let mut entered = false;

        while attempts < self.max_attempts {
            attempts += 1;
            let resp = self.client.send(Action::Enter, &self.id).await;

            if resp.is_success() {
                self.state = WorkerState::InRoom;
                entered = true;
                tracing::info!(worker = %self.name, id = %self.id, attempt = attempts, "entered the room");

                let dwell = self.delays.dwell();
                tracing::debug!(id = %self.id, dwell_secs = dwell.as_secs_f64(), "dwelling");
                tokio::time::sleep(dwell).await;

                self.leave().await;
                break;
            }

            if attempts < self.max_attempts {
                let backoff = self.delays.backoff();
                tracing::info!(
                    worker = %self.name,
                    id = %self.id,
                    attempt = attempts,
                    reason = resp.message(),
                    retry_in_secs = backoff.as_secs_f64(),
                    "entry failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            } else {
                tracing::info!(
                    worker = %self.name,
                    id = %self.id,
                    attempt = attempts,
                    reason = resp.message(),
                    "entry failed"
                );
            }
        }

        if !entered {
            self.state = WorkerState::GaveUp;
            tracing::warn!(worker = %self.name, id = %self.id, attempts, "gave up");
        }

        WorkerOutcome {
            id: self.id,
            attempts,
            entered,
            state: self.state,
        }
    }

    /// Sends a single leave. A failure is logged and not retried.
    async fn leave(&mut self) {
        if self.state != WorkerState::InRoom {
            return;
        }
        let resp = self.client.send(Action::Leave, &self.id).await;
        if resp.is_success() {
            self.state = WorkerState::NotInRoom;
            tracing::info!(worker = %self.name, id = %self.id, "left the room");
        } else {
            tracing::warn!(worker = %self.name, id = %self.id, reason = resp.message(), "leave failed");
        }
    }
}
