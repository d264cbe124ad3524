//! Worker clients for Roomgate.
//!
//! A [`Worker`] is an independent actor that asks the server for a slot,
//! holds it for a dwell time, then releases it. A refused or failed
//! attempt is retried after a randomized backoff until `max_attempts`
//! is exhausted, then the worker gives up for the run.
//!
//! ```text
//! NotInRoom ──enter ok──▶ InRoom ──dwell, leave ok──▶ NotInRoom
//!     │
//!     └──max_attempts failures──▶ GaveUp
//! ```
//!
//! Delays come from a [`DelayPolicy`] so tests can run the same loop
//! without sleeping.

mod client;
mod config;
mod delay;
mod simulator;
mod worker;

pub use client::{RequestClient, RequestError};
pub use config::WorkerConfig;
pub use delay::{DelayPolicy, FixedDelays, RandomDelays};
pub use simulator::{
    DEFAULT_WORKERS, MAX_WORKERS, ROSTER, Simulator, parse_worker_count,
};
pub use worker::{Worker, WorkerOutcome, WorkerState};
