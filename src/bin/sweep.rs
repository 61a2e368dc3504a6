//! GCS Sweep Harness
//!
//! Sends every opcode in turn and prints the raw replies.

use std::thread;

use advgcs::config::BATCH_TIMEOUT_MS;
use advgcs::console::describe_sweep;
use advgcs::protocol::Opcode;
use advgcs::{CommandChannel, Config, PeerAddress};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// GCS sweep harness
#[derive(Parser, Debug)]
#[command(name = "gcs-sweep")]
#[command(about = "Send every command to the FSW in sequence")]
#[command(version)]
struct Args {
    /// FSW address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    fsw: PeerAddress,

    /// Reply timeout in milliseconds
    #[arg(short, long, default_value_t = BATCH_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Pause between commands in milliseconds
    #[arg(short, long, default_value = "1000")]
    delay_ms: u64,

    /// Number of passes over the command table
    #[arg(short, long, default_value = "1")]
    repeat: u32,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .peer(args.fsw)
        .recv_timeout_ms(args.timeout_ms)
        .sweep_delay_ms(args.delay_ms)
        .build();

    let channel = match CommandChannel::open(config.recv_timeout()) {
        Ok(channel) => channel,
        Err(e) => {
            tracing::error!("Failed to open command channel: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Sweeping {} commands against {}", Opcode::ALL.len(), config.peer);

    for pass in 1..=args.repeat {
        tracing::info!("Pass {}/{}", pass, args.repeat);

        for opcode in Opcode::ALL {
            println!("Sending {}", opcode);
            match channel.send_command(&config.peer, opcode) {
                Ok(exchange) => {
                    for line in describe_sweep(&exchange) {
                        println!("{}", line);
                    }
                }
                Err(e) => println!("Transport error: {}", e),
            }
            thread::sleep(config.sweep_delay());
        }
    }
}
