//! Tests for FlightSoftware
//!
//! These tests verify:
//! - Restart timing
//! - State-flag based command refusal
//! - Automatic SAFE_MODE / BBQ_MODE transitions
//! - Counter payloads and reply layout
//! - Shutdown

use std::time::{Duration, Instant};

use advgcs::fsw::{FlightSoftware, BBQ_MODE_REJECT_LIMIT, SAFE_MODE_REJECT_LIMIT};
use advgcs::protocol::{decode_reply, AckCode, Opcode, ReplyOutcome, SystemState};

// =============================================================================
// Helper Functions
// =============================================================================

/// FSW already past RESTARTING, with its start time
fn setup_ready_fsw() -> (FlightSoftware, Instant) {
    let start = Instant::now();
    let mut fsw = FlightSoftware::started_at(Duration::ZERO, start);
    fsw.tick_at(start);
    assert_eq!(fsw.state(), SystemState::Ready);
    (fsw, start)
}

fn send(fsw: &mut FlightSoftware, opcode: Opcode) -> Vec<u8> {
    fsw.handle(opcode.as_byte()).bytes.to_vec()
}

// =============================================================================
// Restart Tests
// =============================================================================

#[test]
fn test_starts_restarting() {
    let start = Instant::now();
    let mut fsw = FlightSoftware::started_at(Duration::from_secs(10), start);
    assert_eq!(fsw.state(), SystemState::Restarting);

    fsw.tick_at(start + Duration::from_secs(9));
    assert_eq!(fsw.state(), SystemState::Restarting);

    fsw.tick_at(start + Duration::from_secs(10));
    assert_eq!(fsw.state(), SystemState::Ready);
}

#[test]
fn test_commands_answered_while_restarting() {
    let mut fsw = FlightSoftware::new(Duration::from_secs(3600));
    assert_eq!(send(&mut fsw, Opcode::NumSafeModes), vec![0x00, 0x00, 0x55, 0x01]);
}

// =============================================================================
// Command Refusal Tests
// =============================================================================

#[test]
fn test_forbidden_in_state_is_rejected() {
    let (mut fsw, _) = setup_ready_fsw();

    let reply = fsw.handle(Opcode::SafeModeDisable.as_byte());
    assert_eq!(reply.executed, None);
    assert_eq!(reply.ack, AckCode::Rejected);
    assert_eq!(&reply.bytes[..], &[0xAA, 0x02]);
    assert_eq!(fsw.cmds_rejected(), 1);
    assert_eq!(fsw.cmds_received(), 0);
}

#[test]
fn test_unknown_and_invalid_bytes_rejected() {
    let (mut fsw, _) = setup_ready_fsw();

    assert_eq!(fsw.handle(0x00).ack, AckCode::Rejected);
    assert_eq!(fsw.handle(0xFF).ack, AckCode::Rejected);
    assert_eq!(fsw.cmds_rejected(), 2);
}

// =============================================================================
// Automatic Transition Tests
// =============================================================================

#[test]
fn test_rejections_drive_safe_then_bbq_mode() {
    let (mut fsw, start) = setup_ready_fsw();

    for _ in 0..SAFE_MODE_REJECT_LIMIT {
        send(&mut fsw, Opcode::Invalid);
    }
    assert_eq!(fsw.state(), SystemState::Ready);

    fsw.tick_at(start);
    assert_eq!(fsw.state(), SystemState::SafeMode);
    assert_eq!(fsw.safe_modes(), 1);
    assert_eq!(fsw.cmds_rejected(), 0);

    for _ in 0..BBQ_MODE_REJECT_LIMIT {
        send(&mut fsw, Opcode::Invalid);
    }
    fsw.tick_at(start);
    assert_eq!(fsw.state(), SystemState::BbqMode);

    // BBQ_MODE refuses data requests but can still be brought back to READY
    assert_eq!(send(&mut fsw, Opcode::NumSafeModes), vec![0xAA, 0x08]);
    assert_eq!(send(&mut fsw, Opcode::SafeModeDisable), vec![0x55, 0x02]);
    assert_eq!(fsw.state(), SystemState::Ready);
}

#[test]
fn test_safe_mode_commands() {
    let (mut fsw, _) = setup_ready_fsw();

    assert_eq!(send(&mut fsw, Opcode::SafeModeEnable), vec![0x55, 0x04]);
    assert_eq!(fsw.state(), SystemState::SafeMode);
    assert_eq!(fsw.safe_modes(), 1);

    // Already in SAFE_MODE
    assert_eq!(send(&mut fsw, Opcode::SafeModeEnable), vec![0xAA, 0x04]);

    assert_eq!(send(&mut fsw, Opcode::SafeModeDisable), vec![0x55, 0x02]);
    assert_eq!(fsw.cmds_rejected(), 0);
}

// =============================================================================
// Payload Tests
// =============================================================================

#[test]
fn test_command_count_excludes_current_command() {
    let (mut fsw, _) = setup_ready_fsw();

    assert_eq!(send(&mut fsw, Opcode::NumCmdsReceived), vec![0x00, 0x00, 0x55, 0x02]);
    assert_eq!(send(&mut fsw, Opcode::NumCmdsReceived), vec![0x01, 0x00, 0x55, 0x02]);

    // Rejected commands are not counted
    send(&mut fsw, Opcode::Invalid);
    assert_eq!(send(&mut fsw, Opcode::NumCmdsReceived), vec![0x02, 0x00, 0x55, 0x02]);
}

#[test]
fn test_reset_command_count() {
    let (mut fsw, _) = setup_ready_fsw();

    send(&mut fsw, Opcode::NumSafeModes);
    send(&mut fsw, Opcode::NumSafeModes);
    send(&mut fsw, Opcode::ResetCmdCount);

    // The reset itself counts as received
    assert_eq!(fsw.cmds_received(), 1);
}

#[test]
fn test_up_time_payload() {
    let (mut fsw, start) = setup_ready_fsw();

    let reply = fsw.handle_at(Opcode::ShowUpTime.as_byte(), start + Duration::from_secs(42));
    assert_eq!(reply.executed, Some(Opcode::ShowUpTime));
    assert_eq!(
        &reply.bytes[..],
        &[0x2A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x55, 0x02]
    );

    match decode_reply(Opcode::ShowUpTime, &reply.bytes).unwrap() {
        ReplyOutcome::Completed(decoded) => {
            assert_eq!(decoded.payload.map(|p| p.value), Some(42));
        }
        other => panic!("Expected completed reply, got {:?}", other),
    }
}

// =============================================================================
// Shutdown Tests
// =============================================================================

#[test]
fn test_shutdown() {
    let (mut fsw, _) = setup_ready_fsw();
    assert!(!fsw.is_shutdown());

    let reply = send(&mut fsw, Opcode::Shutdown);
    assert!(fsw.is_shutdown());
    assert_eq!(
        decode_reply(Opcode::Shutdown, &reply).unwrap(),
        ReplyOutcome::ShutdownAcknowledged {
            last_state: SystemState::Ready
        }
    );
}
