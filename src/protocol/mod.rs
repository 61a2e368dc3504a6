//! Protocol Module
//!
//! Defines the wire protocol between the ground station and the FSW.
//!
//! ## Protocol Format
//!
//! ### Request Format
//! ```text
//! ┌──────────┐
//! │Opcode (1)│
//! └──────────┘
//! ```
//!
//! ### Opcodes
//! - 0x0C: SAFE_MODE_ENABLE
//! - 0x12: SAFE_MODE_DISABLE
//! - 0x2C: NUM_CMDS_RECEIVED  - Reply payload: command count
//! - 0x38: NUM_SAFE_MODES     - Reply payload: safe mode count
//! - 0x4C: SHOW_UP_TIME       - Reply payload: seconds since FSW start
//! - 0x5C: RESET_CMD_COUNT
//! - 0x60: SHUTDOWN
//! - 0xFF: INVALID
//!
//! ### Reply Format
//! ```text
//! ┌─────────────────────────────┬──────────┬──────────┐
//! │       Payload (LE)          │  Ack (1) │ State (1)│
//! └─────────────────────────────┴──────────┴──────────┘
//! ```
//!
//! ### Ack Codes
//! - 0x55: ACCEPTED
//! - 0xAA: REJECTED
//!
//! ### States
//! - 0x01: RESTARTING
//! - 0x02: READY
//! - 0x04: SAFE_MODE
//! - 0x08: BBQ_MODE

mod opcode;
mod reply;
mod codec;

pub use opcode::Opcode;
pub use reply::{AckCode, CommandReply, Payload, ReplyOutcome, SystemState};
pub use codec::{
    decode_reply, decode_signed_le, encode_reply, encode_request, encode_signed_le,
    MAX_PAYLOAD_WIDTH, RECV_BUFFER_SIZE, TRAILER_SIZE,
};
