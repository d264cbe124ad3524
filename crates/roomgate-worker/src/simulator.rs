//! Runs a batch of workers concurrently against one server.

use std::sync::Arc;

use futures_util::future::join_all;

use crate::{DelayPolicy, Worker, WorkerConfig, WorkerOutcome};

/// Names handed to simulated workers, in order.
pub const ROSTER: [&str; 10] = [
    "Ana", "Bruno", "Carlos", "Daniela", "Eduardo", "Fernanda", "Gustavo", "Helena", "Igor",
    "Julia",
];

/// Largest supported batch.
pub const MAX_WORKERS: usize = ROSTER.len();

/// Batch size used when the requested one is invalid.
pub const DEFAULT_WORKERS: usize = 5;

/// Parses a worker count. Returns `None` for anything that is not an
/// integer in `1..=MAX_WORKERS`; callers fall back to [`DEFAULT_WORKERS`].
pub fn parse_worker_count(input: &str) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=MAX_WORKERS).contains(n))
}

/// Starts `count` independent workers with a stagger between starts and
/// waits for all of them.
pub struct Simulator<D: DelayPolicy> {
    config: WorkerConfig,
    count: usize,
    delays: Arc<D>,
}

impl<D: DelayPolicy> Simulator<D> {
    /// Creates a simulator. `count` is clamped to `1..=MAX_WORKERS`.
    pub fn new(config: WorkerConfig, count: usize, delays: D) -> Self {
        Self {
            config,
            count: count.clamp(1, MAX_WORKERS),
            delays: Arc::new(delays),
        }
    }

    /// Number of workers this simulator starts.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Runs every worker to completion and returns their outcomes in
    /// roster order.
    pub async fn run(self) -> Vec<WorkerOutcome> {
        tracing::info!(workers = self.count, addr = %self.config.addr(), "starting simulation");

        let mut handles = Vec::with_capacity(self.count);
        for name in ROSTER.iter().take(self.count) {
            let worker = Worker::new(*name, &self.config, Arc::clone(&self.delays));
            handles.push(tokio::spawn(worker.run()));
            tokio::time::sleep(self.delays.stagger()).await;
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for result in join_all(handles).await {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::error!(error = %e, "worker task failed"),
            }
        }

        let entered = outcomes.iter().filter(|o| o.entered).count();
        tracing::info!(workers = outcomes.len(), entered, "simulation finished");
        outcomes
    }
}
