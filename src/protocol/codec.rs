//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! ┌──────────┐
//! │Opcode (1)│
//! └──────────┘
//! ```
//!
//! ### Reply Format
//! ```text
//! ┌─────────────────────────────┬──────────┬──────────┐
//! │   Payload (N - 2, LE i*)    │  Ack (1) │ State (1)│
//! └─────────────────────────────┴──────────┴──────────┘
//! ```
//!
//! The payload width is not fixed per opcode: it is whatever precedes the
//! trailer, so the FSW picks the width per reply.

use bytes::{BufMut, Bytes, BytesMut};

use super::{AckCode, CommandReply, Opcode, Payload, ReplyOutcome, SystemState};
use crate::error::DecodeError;

/// Receive buffer capacity; longer datagrams are truncated by the transport
pub const RECV_BUFFER_SIZE: usize = 64;

/// Ack byte + state byte
pub const TRAILER_SIZE: usize = 2;

/// Widest payload whose every value fits an `i128`
pub const MAX_PAYLOAD_WIDTH: usize = 16;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request datagram: the opcode byte, unsigned
pub fn encode_request(opcode: Opcode) -> [u8; 1] {
    [opcode.as_byte()]
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply datagram
///
/// `payload` is `(value, width)`; the value is written as `width`
/// little-endian bytes and must fit in that width.
pub fn encode_reply(payload: Option<(i128, usize)>, ack: AckCode, state: SystemState) -> Bytes {
    let width = payload.map(|(_, w)| w).unwrap_or(0);
    let mut message = BytesMut::with_capacity(width + TRAILER_SIZE);

    if let Some((value, width)) = payload {
        message.put_slice(&encode_signed_le(value, width));
    }
    message.put_u8(ack.as_byte());
    message.put_u8(state.as_byte());

    message.freeze()
}

/// Decode a reply to `opcode`
///
/// Pure: the same `(opcode, raw)` always yields the same result.
pub fn decode_reply(opcode: Opcode, raw: &[u8]) -> Result<ReplyOutcome, DecodeError> {
    if raw.len() < TRAILER_SIZE {
        return Err(DecodeError::TooShort { len: raw.len() });
    }

    let split = raw.len() - TRAILER_SIZE;
    let ack = AckCode::from_byte(raw[split]);
    let state_byte = raw[split + 1];
    let state = SystemState::from_byte(state_byte);

    // Shutdown replies carry no payload worth reading
    if opcode == Opcode::Shutdown && ack == AckCode::Accepted {
        let last_state = require_state(state, state_byte, ack, None)?;
        return Ok(ReplyOutcome::ShutdownAcknowledged { last_state });
    }

    let payload = match opcode.return_label() {
        Some(label) => {
            let bytes = &raw[..split];
            match decode_signed_le(bytes) {
                Some(value) => Some(Payload { label, value }),
                None if bytes.is_empty() => None,
                None => {
                    return Err(DecodeError::PayloadTooWide {
                        len: bytes.len(),
                        ack,
                        state,
                    })
                }
            }
        }
        None => None,
    };

    let state = require_state(state, state_byte, ack, payload.map(|p| p.value))?;

    Ok(ReplyOutcome::Completed(CommandReply {
        opcode,
        raw: Bytes::copy_from_slice(raw),
        ack,
        state,
        payload,
    }))
}

/// Insist on a known state byte, keeping the other fields on failure
fn require_state(
    state: Option<SystemState>,
    byte: u8,
    ack: AckCode,
    payload: Option<i128>,
) -> Result<SystemState, DecodeError> {
    state.ok_or(DecodeError::UnknownState {
        state: byte,
        ack,
        payload,
    })
}

// =============================================================================
// Signed little-endian helpers
// =============================================================================

/// Encode `value` as `width` little-endian two's-complement bytes
///
/// Bytes above `width` are dropped, so `value` must be representable in
/// `width` bytes for the round trip to hold.
pub fn encode_signed_le(value: i128, width: usize) -> Vec<u8> {
    let full = value.to_le_bytes();
    let fill = if value < 0 { 0xFF } else { 0x00 };

    (0..width)
        .map(|i| full.get(i).copied().unwrap_or(fill))
        .collect()
}

/// Decode a little-endian two's-complement integer of any width
///
/// Returns `None` for an empty slice, or when the value does not fit an
/// `i128`. Bytes past [`MAX_PAYLOAD_WIDTH`] are accepted as long as they are
/// only sign extension.
pub fn decode_signed_le(bytes: &[u8]) -> Option<i128> {
    let (&top, _) = bytes.split_last()?;
    let negative = top & 0x80 != 0;
    let fill = if negative { 0xFF } else { 0x00 };

    let (low, high) = bytes.split_at(bytes.len().min(MAX_PAYLOAD_WIDTH));
    if high.iter().any(|&b| b != fill) {
        return None;
    }

    // Sign-extend from the most significant received byte
    let mut buf = [fill; MAX_PAYLOAD_WIDTH];
    buf[..low.len()].copy_from_slice(low);
    let value = i128::from_le_bytes(buf);

    // The extension bytes must agree with the sign of what fits
    if !high.is_empty() && (value < 0) != negative {
        return None;
    }
    Some(value)
}
