//! # advgcs
//!
//! A minimal ground control station (GCS) client for a flight software (FSW)
//! simulator, plus the simulator itself:
//! - Single-byte command opcodes over UDP
//! - Replies with an optional little-endian payload and an (ack, state) trailer
//! - Bounded receive timeouts, no automatic retries
//! - A simulated FSW state machine to command against
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  gcs-cli (REPL)      │   │  gcs-sweep (batch)   │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            └────────────┬─────────────┘
//!                         ▼
//!               ┌───────────────────┐
//!               │  CommandChannel   │──── protocol::decode_reply
//!               └─────────┬─────────┘
//!                         │  UDP: [opcode] ─▶ ◀─ [payload][ack][state]
//!               ┌─────────▼─────────┐
//!               │     FswServer     │
//!               └─────────┬─────────┘
//!                         ▼
//!               ┌───────────────────┐
//!               │  FlightSoftware   │
//!               └───────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod fsw;
pub mod console;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GcsError, Result};
pub use config::Config;
pub use network::{CommandChannel, Exchange, PeerAddress};
pub use fsw::FlightSoftware;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of advgcs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
