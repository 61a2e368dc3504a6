//! Codec Tests
//!
//! Tests for request encoding and reply decoding.

use advgcs::error::DecodeError;
use advgcs::protocol::{
    decode_reply, decode_signed_le, encode_reply, encode_request, encode_signed_le,
    AckCode, Opcode, Payload, ReplyOutcome, SystemState, MAX_PAYLOAD_WIDTH,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn completed(outcome: ReplyOutcome) -> advgcs::protocol::CommandReply {
    match outcome {
        ReplyOutcome::Completed(reply) => reply,
        other => panic!("Expected completed reply, got {:?}", other),
    }
}

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_request_is_single_unsigned_byte() {
    for op in Opcode::ALL {
        assert_eq!(encode_request(op), [op.as_byte()]);
    }
    assert_eq!(encode_request(Opcode::Invalid), [0xFF]);
}

// =============================================================================
// Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_up_time_reply() {
    let raw = [0x2A, 0x00, 0x00, 0x00, 0x55, 0x02];
    let reply = completed(decode_reply(Opcode::ShowUpTime, &raw).unwrap());

    assert_eq!(reply.ack, AckCode::Accepted);
    assert_eq!(reply.state, SystemState::Ready);
    assert_eq!(
        reply.payload,
        Some(Payload {
            label: "Seconds since FSW start",
            value: 42
        })
    );
    assert_eq!(&reply.raw[..], &raw[..]);
}

#[test]
fn test_decode_shutdown_acknowledged() {
    let outcome = decode_reply(Opcode::Shutdown, &[0x55, 0x01]).unwrap();
    assert_eq!(
        outcome,
        ReplyOutcome::ShutdownAcknowledged {
            last_state: SystemState::Restarting
        }
    );
}

#[test]
fn test_decode_shutdown_ignores_leading_bytes() {
    // Some FSW builds prefix a 0xFF marker to shutdown replies
    let outcome = decode_reply(Opcode::Shutdown, &[0xFF, 0x55, 0x02]).unwrap();
    assert_eq!(
        outcome,
        ReplyOutcome::ShutdownAcknowledged {
            last_state: SystemState::Ready
        }
    );
}

#[test]
fn test_decode_shutdown_rejected_is_plain_reply() {
    let reply = completed(decode_reply(Opcode::Shutdown, &[0xAA, 0x08]).unwrap());
    assert_eq!(reply.ack, AckCode::Rejected);
    assert_eq!(reply.state, SystemState::BbqMode);
    assert_eq!(reply.payload, None);
}

#[test]
fn test_decode_too_short() {
    assert_eq!(
        decode_reply(Opcode::ShowUpTime, &[]),
        Err(DecodeError::TooShort { len: 0 })
    );
    assert_eq!(
        decode_reply(Opcode::Shutdown, &[0x02]),
        Err(DecodeError::TooShort { len: 1 })
    );
}

#[test]
fn test_decode_unknown_state_keeps_ack() {
    assert_eq!(
        decode_reply(Opcode::SafeModeEnable, &[0xAA, 9]),
        Err(DecodeError::UnknownState {
            state: 9,
            ack: AckCode::Rejected,
            payload: None
        })
    );
}

#[test]
fn test_decode_unknown_state_keeps_payload() {
    assert_eq!(
        decode_reply(Opcode::NumSafeModes, &[0x03, 0x00, 0x55, 0x0C]),
        Err(DecodeError::UnknownState {
            state: 0x0C,
            ack: AckCode::Accepted,
            payload: Some(3)
        })
    );
}

#[test]
fn test_decode_shutdown_unknown_state() {
    assert_eq!(
        decode_reply(Opcode::Shutdown, &[0x55, 0x00]),
        Err(DecodeError::UnknownState {
            state: 0,
            ack: AckCode::Accepted,
            payload: None
        })
    );
}

#[test]
fn test_decode_unrecognized_ack_is_not_an_error() {
    let reply = completed(decode_reply(Opcode::ResetCmdCount, &[0x00, 0x04]).unwrap());
    assert_eq!(reply.ack, AckCode::Unknown(0x00));
    assert_eq!(reply.state, SystemState::SafeMode);
}

#[test]
fn test_decode_empty_payload_for_return_opcode() {
    let reply = completed(decode_reply(Opcode::NumCmdsReceived, &[0xAA, 0x08]).unwrap());
    assert_eq!(reply.payload, None);
}

#[test]
fn test_decode_non_return_opcode_skips_payload() {
    let reply = completed(decode_reply(Opcode::SafeModeEnable, &[0x01, 0x02, 0x55, 0x04]).unwrap());
    assert_eq!(reply.payload, None);
    assert_eq!(reply.raw.len(), 4);
}

#[test]
fn test_decode_negative_payload() {
    let reply = completed(decode_reply(Opcode::NumCmdsReceived, &[0xFE, 0xFF, 0x55, 0x02]).unwrap());
    assert_eq!(reply.payload.map(|p| p.value), Some(-2));
}

#[test]
fn test_decode_payload_too_wide_keeps_trailer() {
    let mut raw = vec![0x01; MAX_PAYLOAD_WIDTH + 1];
    raw.extend_from_slice(&[0x55, 0x02]);
    assert_eq!(
        decode_reply(Opcode::ShowUpTime, &raw),
        Err(DecodeError::PayloadTooWide {
            len: MAX_PAYLOAD_WIDTH + 1,
            ack: AckCode::Accepted,
            state: Some(SystemState::Ready)
        })
    );
}

#[test]
fn test_decode_payload_too_wide_with_unknown_state() {
    let mut raw = vec![0x7F; 30];
    raw.extend_from_slice(&[0xAA, 0x03]);
    assert_eq!(
        decode_reply(Opcode::NumCmdsReceived, &raw),
        Err(DecodeError::PayloadTooWide {
            len: 30,
            ack: AckCode::Rejected,
            state: None
        })
    );
}

#[test]
fn test_decode_wide_payload_that_fits() {
    // 62 payload bytes: the most a 64-byte buffer can carry
    let mut raw = vec![0x2A];
    raw.resize(62, 0x00);
    raw.extend_from_slice(&[0x55, 0x02]);

    let reply = completed(decode_reply(Opcode::ShowUpTime, &raw).unwrap());
    assert_eq!(reply.payload.map(|p| p.value), Some(42));
    assert_eq!(reply.state, SystemState::Ready);
}

#[test]
fn test_decode_is_idempotent() {
    let inputs: [&[u8]; 4] = [
        &[0x2A, 0x00, 0x55, 0x02],
        &[0xAA, 9],
        &[0x55],
        &[0x55, 0x01],
    ];
    for raw in inputs {
        for op in Opcode::ALL {
            assert_eq!(decode_reply(op, raw), decode_reply(op, raw));
        }
    }
}

// =============================================================================
// Payload Round Trip Tests
// =============================================================================

#[test]
fn test_signed_round_trip_at_width_bounds() {
    for width in 1..=MAX_PAYLOAD_WIDTH {
        let min = i128::MIN >> (128 - 8 * width);
        let max = !min;

        for value in [min, min + 1, -1, 0, 1, max - 1, max] {
            let bytes = encode_signed_le(value, width);
            assert_eq!(bytes.len(), width);
            assert_eq!(decode_signed_le(&bytes), Some(value), "width {}", width);
        }
    }
}

#[test]
fn test_encode_reply_layout() {
    let bytes = encode_reply(Some((300, 2)), AckCode::Accepted, SystemState::SafeMode);
    assert_eq!(&bytes[..], &[0x2C, 0x01, 0x55, 0x04]);

    let bytes = encode_reply(None, AckCode::Rejected, SystemState::Ready);
    assert_eq!(&bytes[..], &[0xAA, 0x02]);
}

#[test]
fn test_encode_reply_decodes() {
    let bytes = encode_reply(Some((-7, 8)), AckCode::Accepted, SystemState::Ready);
    let reply = completed(decode_reply(Opcode::ShowUpTime, &bytes).unwrap());
    assert_eq!(reply.payload.map(|p| p.value), Some(-7));
}
