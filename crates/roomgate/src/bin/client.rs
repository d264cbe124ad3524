//! Roomgate worker simulator.
//!
//! Starts a batch of workers that compete for room slots, then waits for
//! all of them. Without `--workers` the count is read from stdin.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomgate-client
//! cargo run --bin roomgate-client -- --workers 8
//! ```

use std::io::{self, BufRead, Write};

use clap::Parser;
use roomgate::prelude::*;
use roomgate_worker::{DEFAULT_WORKERS, MAX_WORKERS, parse_worker_count};

#[derive(Parser, Debug)]
#[command(name = "roomgate-client")]
#[command(about = "Simulates workers competing for room slots", long_about = None)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short = 'p', long, default_value_t = 65432)]
    port: u16,

    /// Number of workers (1-10); prompts when omitted
    #[arg(short = 'w', long)]
    workers: Option<String>,
}

/// Asks for the worker count on stdin and returns the raw answer.
fn prompt_worker_count() -> String {
    print!("Number of workers to simulate (1-{MAX_WORKERS}): ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        line.clear();
    }
    line
}

#[tokio::main]
async fn main() {
    init_logging("info");

    let args = Args::parse();
    let raw = args.workers.unwrap_or_else(prompt_worker_count);
    let count = parse_worker_count(&raw).unwrap_or_else(|| {
        tracing::warn!(
            input = raw.trim(),
            count = DEFAULT_WORKERS,
            "invalid worker count, using default"
        );
        DEFAULT_WORKERS
    });

    let config = WorkerConfig {
        host: args.host,
        port: args.port,
        ..WorkerConfig::default()
    };

    let outcomes = Simulator::new(config, count, RandomDelays::default())
        .run()
        .await;

    for outcome in &outcomes {
        tracing::info!(
            id = %outcome.id,
            attempts = outcome.attempts,
            entered = outcome.entered,
            state = %outcome.state,
            "worker finished"
        );
    }
}
