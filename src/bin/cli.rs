//! GCS Interactive Client
//!
//! Menu-driven command-line interface for commanding the FSW.

use std::io::{self, BufRead, Write};

use advgcs::config::INTERACTIVE_TIMEOUT_MS;
use advgcs::console::{describe_exchange, menu_lines, parse_menu_input, MenuInput};
use advgcs::{CommandChannel, Config, PeerAddress};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// GCS interactive client
#[derive(Parser, Debug)]
#[command(name = "gcs-cli")]
#[command(about = "Send commands to the FSW one at a time")]
#[command(version)]
struct Args {
    /// FSW address (host:port); prompted for when omitted
    #[arg(short, long)]
    fsw: Option<String>,

    /// Reply timeout in milliseconds
    #[arg(short, long, default_value_t = INTERACTIVE_TIMEOUT_MS)]
    timeout_ms: u64,
}

fn main() {
    // Diagnostics go to stderr so they don't interleave with the menu
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    println!("Hello! Welcome to the Advanced Space GCS application.");
    println!("Type \"quit\" to exit, or \"help\" to receive a list of commands to send");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let address = match args.fsw {
        Some(address) => address,
        None => prompt(
            &mut input,
            &mut output,
            "Input FSW IP address and port (xxx.xxx.xxx.xxx:yyy, defaults to local host): ",
        )
        .unwrap_or_default(),
    };

    let peer = match PeerAddress::parse_or_default(&address) {
        (peer, None) => {
            println!("Using {}", peer);
            peer
        }
        (peer, Some(e)) => {
            tracing::debug!("Falling back to default address: {}", e);
            println!("Using localhost and port {}", peer.port());
            peer
        }
    };

    let config = Config::builder()
        .peer(peer)
        .recv_timeout_ms(args.timeout_ms)
        .build();

    let channel = match CommandChannel::open(config.recv_timeout()) {
        Ok(channel) => channel,
        Err(e) => {
            tracing::error!("Failed to open command channel: {}", e);
            eprintln!("Failed to open command channel: {}", e);
            std::process::exit(1);
        }
    };

    print_lines(&menu_lines());

    loop {
        let message = "Input a command to send (by number): ";
        let Some(line) = prompt(&mut input, &mut output, message) else {
            break;
        };

        match parse_menu_input(&line) {
            Ok(MenuInput::Quit) => break,
            Ok(MenuInput::Help) => print_lines(&menu_lines()),
            Ok(MenuInput::Send(opcode)) => {
                println!("Sending {}", opcode);
                match channel.send_command(&config.peer, opcode) {
                    Ok(exchange) => print_lines(&describe_exchange(opcode, &exchange)),
                    Err(e) => println!("Transport error: {}", e),
                }
            }
            Err(e) => println!("Invalid Input: {}", e),
        }
    }
}

/// Print `message` and read one line; `None` on end of input
///
/// A prompt that fails to display is logged; the read still happens.
fn prompt(input: &mut impl BufRead, output: &mut impl Write, message: &str) -> Option<String> {
    if let Err(e) = write!(output, "{}", message).and_then(|_| output.flush()) {
        tracing::debug!("Failed to display prompt: {}", e);
    }

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim_end().to_string()),
        Err(e) => {
            tracing::warn!("Failed to read input: {}", e);
            None
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
