//! Roomgate server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomgate-server
//! cargo run --bin roomgate-server -- --port 7000 --capacity 3
//! ```

use std::time::Duration;

use clap::Parser;
use roomgate::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "roomgate-server")]
#[command(about = "TCP server guarding a capacity-limited room", long_about = None)]
struct Args {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind to
    #[arg(short = 'p', long, default_value_t = 65432)]
    port: u16,

    /// Number of slots in the room
    #[arg(short = 'c', long, default_value_t = 5)]
    capacity: usize,

    /// Seconds a connection may stay idle before it is closed
    #[arg(long, default_value_t = 30)]
    idle_timeout_secs: u64,

    /// Free a connection's slots when it closes or times out
    #[arg(long)]
    release_on_disconnect: bool,
}

#[tokio::main]
async fn main() {
    init_logging("info");

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    let room_config = RoomConfig {
        capacity: args.capacity,
        release_on_disconnect: args.release_on_disconnect,
        ..RoomConfig::default()
    };

    let server = match Server::builder()
        .bind(&addr)
        .room_config(room_config)
        .idle_timeout(Duration::from_secs(args.idle_timeout_secs))
        .build()
        .await
    {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to start server");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "server stopped with error");
        std::process::exit(1);
    }
}
