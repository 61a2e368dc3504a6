//! Reply definitions
//!
//! Trailer enumerations and the decoded form of a reply datagram.

use std::fmt;

use bytes::Bytes;

use super::Opcode;

/// FSW system state, carried in the last byte of every reply
///
/// The values are bit-shaped but decoded by exact match only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SystemState {
    Restarting = 1,
    Ready = 2,
    SafeMode = 4,
    BbqMode = 8,
}

impl SystemState {
    pub const ALL: [SystemState; 4] = [
        SystemState::Restarting,
        SystemState::Ready,
        SystemState::SafeMode,
        SystemState::BbqMode,
    ];

    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Exact-match decode; combined flags are not a valid state
    pub fn from_byte(byte: u8) -> Option<SystemState> {
        match byte {
            1 => Some(SystemState::Restarting),
            2 => Some(SystemState::Ready),
            4 => Some(SystemState::SafeMode),
            8 => Some(SystemState::BbqMode),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SystemState::Restarting => "RESTARTING",
            SystemState::Ready => "READY",
            SystemState::SafeMode => "SAFE_MODE",
            SystemState::BbqMode => "BBQ_MODE",
        }
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Acknowledgement byte, second to last in every reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckCode {
    Accepted,
    Rejected,
    /// Any other byte value
    Unknown(u8),
}

impl AckCode {
    pub const ACCEPTED: u8 = 0x55;
    pub const REJECTED: u8 = 0xAA;

    pub fn from_byte(byte: u8) -> AckCode {
        match byte {
            Self::ACCEPTED => AckCode::Accepted,
            Self::REJECTED => AckCode::Rejected,
            other => AckCode::Unknown(other),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            AckCode::Accepted => Self::ACCEPTED,
            AckCode::Rejected => Self::REJECTED,
            AckCode::Unknown(byte) => byte,
        }
    }
}

impl fmt::Display for AckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AckCode::Accepted => f.write_str("ACCEPTED"),
            AckCode::Rejected => f.write_str("REJECTED"),
            AckCode::Unknown(byte) => write!(f, "UNKNOWN(0x{:02x})", byte),
        }
    }
}

/// Decoded value returned by a data-carrying command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload {
    /// Human description of the value
    pub label: &'static str,

    /// Little-endian signed value, width taken from the reply length
    pub value: i128,
}

/// A fully decoded reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// Opcode the reply answers
    pub opcode: Opcode,

    /// Bytes as received (at most the receive buffer size)
    pub raw: Bytes,

    pub ack: AckCode,

    pub state: SystemState,

    /// Present only for return-value opcodes with a non-empty payload
    pub payload: Option<Payload>,
}

/// Result of interpreting a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// SHUTDOWN was accepted; the FSW is going away
    ShutdownAcknowledged { last_state: SystemState },

    /// Any other reply
    Completed(CommandReply),
}
