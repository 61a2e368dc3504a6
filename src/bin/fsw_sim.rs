//! FSW Simulator Binary
//!
//! Starts the simulated flight software on a UDP port.

use advgcs::network::FswServer;
use advgcs::Config;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// FSW simulator
#[derive(Parser, Debug)]
#[command(name = "fsw-sim")]
#[command(about = "Simulated flight software answering GCS commands")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Seconds spent in RESTARTING before becoming READY
    #[arg(short, long, default_value = "10")]
    restart_secs: u64,

    /// Receive poll interval in milliseconds
    #[arg(short, long, default_value = "200")]
    poll_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,advgcs=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("FSW simulator v{}", advgcs::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .restart_delay_ms(args.restart_secs.saturating_mul(1000))
        .poll_timeout_ms(args.poll_ms)
        .build();

    let server = match FswServer::bind(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to create server socket: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Flight software initialized");

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
