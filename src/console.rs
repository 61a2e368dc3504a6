//! Console Module
//!
//! Operator-facing text for the interactive client and the sweep harness.
//! Everything here returns lines instead of printing so it can be tested.

use crate::error::{DecodeError, SelectionError};
use crate::network::Exchange;
use crate::protocol::{decode_reply, AckCode, Opcode, ReplyOutcome, SystemState};

/// One line of operator input, interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    Quit,
    Help,
    Send(Opcode),
}

/// Parse a menu line: `quit`, `help`, or a command index
pub fn parse_menu_input(line: &str) -> Result<MenuInput, SelectionError> {
    let line = line.trim();

    if line.eq_ignore_ascii_case("quit") {
        return Ok(MenuInput::Quit);
    }
    if line.eq_ignore_ascii_case("help") {
        return Ok(MenuInput::Help);
    }

    let index = line
        .parse::<usize>()
        .map_err(|_| SelectionError::NotANumber(line.to_string()))?;

    Opcode::from_index(index)
        .map(MenuInput::Send)
        .ok_or_else(|| SelectionError::out_of_range(index))
}

/// The numbered list of sendable commands
pub fn menu_lines() -> Vec<String> {
    let mut lines = vec!["This is a full list of sendable commands:".to_string()];
    lines.extend(
        Opcode::ALL
            .iter()
            .enumerate()
            .map(|(idx, op)| format!("\t{} - {}", idx, op)),
    );
    lines
}

// =============================================================================
// Interactive rendering
// =============================================================================

/// Describe the result of one exchange for the interactive client
///
/// Decode failures still print whatever was recovered plus the raw bytes.
pub fn describe_exchange(opcode: Opcode, exchange: &Exchange) -> Vec<String> {
    let raw = match exchange {
        Exchange::TimedOut => return vec!["Request Timed Out".to_string()],
        Exchange::Reply(raw) => raw,
    };

    let mut lines = Vec::new();
    match decode_reply(opcode, raw) {
        Ok(ReplyOutcome::ShutdownAcknowledged { last_state }) => {
            lines.push(ack_line(AckCode::Accepted));
            lines.push(format!("FSW Shutting Down, Last State: {}", last_state));
        }
        Ok(ReplyOutcome::Completed(reply)) => {
            lines.push(ack_line(reply.ack));
            if let Some(payload) = reply.payload {
                lines.push(format!("{}: {}", payload.label, payload.value));
            }
            lines.push(format!("Current State: {}", reply.state));
        }
        Err(DecodeError::UnknownState { state, ack, payload }) => {
            lines.push(ack_line(ack));
            if let (Some(label), Some(value)) = (opcode.return_label(), payload) {
                lines.push(format!("{}: {}", label, value));
            }
            lines.push(format!("Current State: unknown (0x{:02x})", state));
            lines.push(raw_line(raw));
        }
        Err(DecodeError::PayloadTooWide { len, ack, state }) => {
            lines.push(ack_line(ack));
            let label = opcode.return_label().unwrap_or("Payload");
            lines.push(format!("{}: does not fit ({} bytes)", label, len));
            lines.push(state_line(state, raw));
            lines.push(raw_line(raw));
        }
        Err(e) => {
            lines.push(format!("Could not decode reply: {}", e));
            lines.push(raw_line(raw));
        }
    }
    lines
}

fn ack_line(ack: AckCode) -> String {
    match ack {
        AckCode::Accepted => "Command Accepted".to_string(),
        AckCode::Rejected => "Command Rejected".to_string(),
        AckCode::Unknown(byte) => format!("Unrecognized ack 0x{:02x}", byte),
    }
}

fn state_line(state: Option<SystemState>, raw: &[u8]) -> String {
    match (state, raw.last()) {
        (Some(state), _) => format!("Current State: {}", state),
        (None, Some(byte)) => format!("Current State: unknown (0x{:02x})", byte),
        (None, None) => "Current State: unknown".to_string(),
    }
}

fn raw_line(raw: &[u8]) -> String {
    format!("Raw reply: {:02x?}", raw)
}

// =============================================================================
// Sweep rendering
// =============================================================================

/// Describe one exchange for the sweep harness: raw bytes and state only
pub fn describe_sweep(exchange: &Exchange) -> Vec<String> {
    let raw = match exchange {
        Exchange::TimedOut => return vec!["Request Timed Out".to_string()],
        Exchange::Reply(raw) => raw,
    };

    let state = match raw.last() {
        None => "none (empty reply)".to_string(),
        Some(&byte) => match SystemState::from_byte(byte) {
            Some(state) => state.to_string(),
            None => format!("unknown (0x{:02x})", byte),
        },
    };

    vec![format!("Received: {:02x?}", &raw[..]), format!("State: {}", state)]
}
