//! Network Module
//!
//! UDP command channel (GCS side) and UDP server (FSW side).
//!
//! ## Architecture
//! - One datagram per direction per exchange
//! - Client blocks on receive with a bounded timeout, never retries
//! - Server polls with a short timeout so state ticks keep running

mod address;
mod channel;
mod server;

pub use address::PeerAddress;
pub use channel::{CommandChannel, Exchange};
pub use server::{FswServer, MAX_RECV_FAILURES};
