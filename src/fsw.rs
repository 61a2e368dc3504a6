//! FSW Module
//!
//! Simulated flight software: the state machine that answers GCS commands.
//!
//! ## State Transitions
//!
//! ```text
//!   RESTARTING ──(restart delay)──▶ READY ──(5 rejected)──▶ SAFE_MODE ──(3 rejected)──▶ BBQ_MODE
//!                                     ▲  ◀──SAFE_MODE_DISABLE──  │                         │
//!                                     │   ──SAFE_MODE_ENABLE──▶  │                         │
//!                                     └──────────────SAFE_MODE_DISABLE─────────────────────┘
//! ```
//!
//! ## Responsibilities
//! - Refuse opcodes whose state flags include the current state
//! - Keep the command, rejection and safe mode counters
//! - Build the reply datagram for every command

use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::protocol::{encode_reply, AckCode, Opcode, SystemState};

/// Rejected commands in READY before dropping to SAFE_MODE
pub const SAFE_MODE_REJECT_LIMIT: u8 = 5;

/// Rejected commands in SAFE_MODE before dropping to BBQ_MODE
pub const BBQ_MODE_REJECT_LIMIT: u8 = 3;

/// Width of the counter payloads (u16 on the FSW)
const COUNTER_WIDTH: usize = 2;

/// Width of the up time payload (seconds as i64)
const UP_TIME_WIDTH: usize = 8;

/// A reply produced by the simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FswReply {
    /// The opcode that was executed, `None` if the command was rejected
    pub executed: Option<Opcode>,

    pub ack: AckCode,

    /// Datagram to send back
    pub bytes: Bytes,
}

/// The simulated flight software
pub struct FlightSoftware {
    state: SystemState,

    /// When the main loop started (up time reference)
    started: Instant,

    /// How long RESTARTING lasts
    restart_delay: Duration,

    cmds_received: u16,
    cmds_rejected: u8,
    safe_modes: u16,

    shutdown: bool,
}

impl FlightSoftware {
    /// Start a new FSW in RESTARTING
    pub fn new(restart_delay: Duration) -> Self {
        Self::started_at(restart_delay, Instant::now())
    }

    /// Start a new FSW with an explicit start time
    pub fn started_at(restart_delay: Duration, started: Instant) -> Self {
        tracing::info!("Transitioning to {}", SystemState::Restarting);
        Self {
            state: SystemState::Restarting,
            started,
            restart_delay,
            cmds_received: 0,
            cmds_rejected: 0,
            safe_modes: 0,
            shutdown: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn cmds_received(&self) -> u16 {
        self.cmds_received
    }

    pub fn cmds_rejected(&self) -> u8 {
        self.cmds_rejected
    }

    pub fn safe_modes(&self) -> u16 {
        self.safe_modes
    }

    /// True once SHUTDOWN has been executed
    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    // =========================================================================
    // State Actions
    // =========================================================================

    /// Apply automatic transitions
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Apply automatic transitions as of `now`
    pub fn tick_at(&mut self, now: Instant) {
        match self.state {
            SystemState::Restarting => {
                if now.saturating_duration_since(self.started) >= self.restart_delay {
                    self.transition(SystemState::Ready);
                }
            }
            SystemState::Ready => {
                if self.cmds_rejected >= SAFE_MODE_REJECT_LIMIT {
                    self.enter_safe_mode();
                }
            }
            SystemState::SafeMode => {
                if self.cmds_rejected >= BBQ_MODE_REJECT_LIMIT {
                    self.transition(SystemState::BbqMode);
                }
            }
            SystemState::BbqMode => {}
        }
    }

    // =========================================================================
    // Command Handling
    // =========================================================================

    /// Execute one received command byte and build the reply
    pub fn handle(&mut self, command: u8) -> FswReply {
        self.handle_at(command, Instant::now())
    }

    /// Execute one received command byte as of `now`
    pub fn handle_at(&mut self, command: u8, now: Instant) -> FswReply {
        tracing::debug!("Received a command: 0x{:02x}", command);

        let opcode = match Opcode::from_byte(command) {
            Some(Opcode::Invalid) | None => None,
            Some(op) if op.is_forbidden_in(self.state) => {
                tracing::info!("Command {} used in wrong state {}", op, self.state);
                None
            }
            Some(op) => Some(op),
        };

        let Some(opcode) = opcode else {
            tracing::info!("Received invalid command 0x{:02x}", command);
            self.cmds_rejected = self.cmds_rejected.saturating_add(1);
            return self.reply(None, AckCode::Rejected, None);
        };

        let payload = self.execute(opcode, now);
        self.cmds_received = self.cmds_received.wrapping_add(1);

        self.reply(Some(opcode), AckCode::Accepted, payload)
    }

    /// Perform the commanded action, returning `(value, width)` for
    /// data-carrying commands
    fn execute(&mut self, opcode: Opcode, now: Instant) -> Option<(i128, usize)> {
        match opcode {
            Opcode::SafeModeEnable => {
                self.enter_safe_mode();
                None
            }
            Opcode::SafeModeDisable => {
                self.transition(SystemState::Ready);
                self.cmds_rejected = 0;
                None
            }
            Opcode::NumCmdsReceived => {
                tracing::debug!("Returning number of commands received: {}", self.cmds_received);
                Some((i128::from(self.cmds_received), COUNTER_WIDTH))
            }
            Opcode::NumSafeModes => {
                tracing::debug!("Returning number of safe modes: {}", self.safe_modes);
                Some((i128::from(self.safe_modes), COUNTER_WIDTH))
            }
            Opcode::ShowUpTime => {
                let secs = now.saturating_duration_since(self.started).as_secs();
                let secs = i64::try_from(secs).unwrap_or(i64::MAX);
                tracing::debug!("Returning number of seconds since starting: {}", secs);
                Some((i128::from(secs), UP_TIME_WIDTH))
            }
            Opcode::ResetCmdCount => {
                tracing::debug!("Resetting command count");
                self.cmds_received = 0;
                None
            }
            Opcode::Shutdown => {
                tracing::info!("Shutting down");
                self.shutdown = true;
                None
            }
            // filtered out by handle_at
            Opcode::Invalid => None,
        }
    }

    fn reply(
        &self,
        executed: Option<Opcode>,
        ack: AckCode,
        payload: Option<(i128, usize)>,
    ) -> FswReply {
        FswReply {
            executed,
            ack,
            bytes: encode_reply(payload, ack, self.state),
        }
    }

    fn enter_safe_mode(&mut self) {
        self.transition(SystemState::SafeMode);
        self.cmds_rejected = 0;
        self.safe_modes = self.safe_modes.wrapping_add(1);
    }

    fn transition(&mut self, next: SystemState) {
        if self.state != next {
            tracing::info!("Transitioning to {}", next);
        }
        self.state = next;
    }
}
