//! Error types for the GCS client and FSW simulator
//!
//! Provides a unified error type for all operations, plus the narrower
//! decode/input errors that callers are expected to recover from.

use thiserror::Error;

use crate::protocol::{AckCode, Opcode, SystemState};

/// Result type alias using GcsError
pub type Result<T> = std::result::Result<T, GcsError>;

/// Unified error type for GCS operations
#[derive(Debug, Error)]
pub enum GcsError {
    // -------------------------------------------------------------------------
    // Socket Errors (fatal at startup)
    // -------------------------------------------------------------------------
    #[error("Socket error: {0}")]
    Socket(std::io::Error),

    // -------------------------------------------------------------------------
    // I/O Errors (recoverable, scoped to one exchange)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    // -------------------------------------------------------------------------
    // Operator Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GcsError {
    /// True if the error must abort the process: socket setup failures and
    /// invalid configuration, both only raised at startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, GcsError::Socket(_) | GcsError::Config(_))
    }
}

/// Failure to interpret a reply datagram
///
/// `UnknownState` and `PayloadTooWide` still carry everything that could be
/// extracted so the caller can print it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("reply too short: {len} bytes, need at least 2")]
    TooShort { len: usize },

    #[error("unknown state byte {state} (ack {ack})")]
    UnknownState {
        state: u8,
        ack: AckCode,
        payload: Option<i128>,
    },

    #[error("payload of {len} bytes does not fit a 128-bit integer (ack {ack})")]
    PayloadTooWide {
        len: usize,
        ack: AckCode,
        state: Option<SystemState>,
    },
}

/// Peer address rejected by `PeerAddress::parse`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("missing ':' between host and port in {0:?}")]
    MissingPort(String),

    #[error("{0:?} is not an IPv4 address")]
    BadHost(String),

    #[error("{0:?} is not a port number")]
    BadPort(String),
}

/// Menu input that does not name a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{0:?} is not a number")]
    NotANumber(String),

    #[error("no command at index {index} (valid: 0..={max})")]
    OutOfRange { index: usize, max: usize },
}

impl SelectionError {
    /// Out-of-range error for the current opcode table
    pub(crate) fn out_of_range(index: usize) -> Self {
        SelectionError::OutOfRange {
            index,
            max: Opcode::ALL.len() - 1,
        }
    }
}
