//! Opcode definitions
//!
//! The closed set of single-byte commands the FSW understands.
//!
//! Bit layout `0bxxxx_yyyy`: `xxxx` is the command id, `yyyy` are the
//! states in which the command is refused (BBQ, SAFE, READY, RESTARTING
//! from high to low bit).

use std::fmt;

use super::SystemState;

/// Command opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    SafeModeEnable = 0x0C,
    SafeModeDisable = 0x12,
    NumCmdsReceived = 0x2C,
    NumSafeModes = 0x38,
    ShowUpTime = 0x4C,
    ResetCmdCount = 0x5C,
    Shutdown = 0x60,
    /// Marker for a command not listed or sent in the wrong state
    Invalid = 0xFF,
}

impl Opcode {
    /// Every opcode, in menu order
    pub const ALL: [Opcode; 8] = [
        Opcode::SafeModeEnable,
        Opcode::SafeModeDisable,
        Opcode::NumCmdsReceived,
        Opcode::NumSafeModes,
        Opcode::ShowUpTime,
        Opcode::ResetCmdCount,
        Opcode::Shutdown,
        Opcode::Invalid,
    ];

    /// Wire value of the opcode
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Look up an opcode by wire value
    pub fn from_byte(byte: u8) -> Option<Opcode> {
        Self::ALL.into_iter().find(|op| op.as_byte() == byte)
    }

    /// Look up an opcode by its menu position
    pub fn from_index(index: usize) -> Option<Opcode> {
        Self::ALL.get(index).copied()
    }

    /// Protocol name, as shown in menus
    pub const fn name(self) -> &'static str {
        match self {
            Opcode::SafeModeEnable => "SAFE_MODE_ENABLE",
            Opcode::SafeModeDisable => "SAFE_MODE_DISABLE",
            Opcode::NumCmdsReceived => "NUM_CMDS_RECEIVED",
            Opcode::NumSafeModes => "NUM_SAFE_MODES",
            Opcode::ShowUpTime => "SHOW_UP_TIME",
            Opcode::ResetCmdCount => "RESET_CMD_COUNT",
            Opcode::Shutdown => "SHUTDOWN",
            Opcode::Invalid => "INVALID",
        }
    }

    /// Description of the value a reply carries, for commands that return one
    ///
    /// `None` means the reply is trailer-only.
    pub const fn return_label(self) -> Option<&'static str> {
        match self {
            Opcode::NumCmdsReceived => Some("Number of correct commands received"),
            Opcode::NumSafeModes => Some("Number of safe modes"),
            Opcode::ShowUpTime => Some("Seconds since FSW start"),
            _ => None,
        }
    }

    /// Whether replies to this opcode carry a payload
    pub const fn has_return_value(self) -> bool {
        self.return_label().is_some()
    }

    /// Whether the FSW refuses this opcode while in `state`
    pub const fn is_forbidden_in(self, state: SystemState) -> bool {
        self.as_byte() & state.as_byte() != 0
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
