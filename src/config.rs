//! Configuration for the GCS client and FSW simulator
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{GcsError, Result};
use crate::network::PeerAddress;

/// Receive timeout for interactive use (milliseconds)
pub const INTERACTIVE_TIMEOUT_MS: u64 = 100;

/// Receive timeout for scripted/batch use (milliseconds)
pub const BATCH_TIMEOUT_MS: u64 = 500;

/// Main configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Client Configuration
    // -------------------------------------------------------------------------
    /// FSW address commands are sent to
    pub peer: PeerAddress,

    /// How long a command waits for its reply (milliseconds)
    pub recv_timeout_ms: u64,

    /// Pause between commands in a sweep (milliseconds)
    pub sweep_delay_ms: u64,

    // -------------------------------------------------------------------------
    // Simulator Configuration
    // -------------------------------------------------------------------------
    /// UDP listen address of the simulator
    pub listen_addr: String,

    /// Receive poll interval of the simulator loop (milliseconds)
    /// State ticks run at least this often.
    pub poll_timeout_ms: u64,

    /// Time spent in RESTARTING before the simulator becomes READY (milliseconds)
    pub restart_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            peer: PeerAddress::default(),
            recv_timeout_ms: INTERACTIVE_TIMEOUT_MS,
            sweep_delay_ms: 1000,
            listen_addr: "0.0.0.0:8080".to_string(),
            poll_timeout_ms: 200,
            restart_delay_ms: 10_000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }

    pub fn sweep_delay(&self) -> Duration {
        Duration::from_millis(self.sweep_delay_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    /// Reject values the socket layer cannot honor
    ///
    /// A zero read timeout means "block forever" to the OS, which would
    /// turn a lost reply into a hang.
    pub fn validate(&self) -> Result<()> {
        if self.recv_timeout_ms == 0 {
            return Err(GcsError::Config("receive timeout must be non-zero".to_string()));
        }
        if self.poll_timeout_ms == 0 {
            return Err(GcsError::Config("poll timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the FSW address
    pub fn peer(mut self, peer: PeerAddress) -> Self {
        self.config.peer = peer;
        self
    }

    /// Set the reply timeout (in milliseconds)
    pub fn recv_timeout_ms(mut self, ms: u64) -> Self {
        self.config.recv_timeout_ms = ms;
        self
    }

    /// Set the delay between sweep commands (in milliseconds)
    pub fn sweep_delay_ms(mut self, ms: u64) -> Self {
        self.config.sweep_delay_ms = ms;
        self
    }

    /// Set the simulator listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the simulator poll interval (in milliseconds)
    pub fn poll_timeout_ms(mut self, ms: u64) -> Self {
        self.config.poll_timeout_ms = ms;
        self
    }

    /// Set the simulated restart duration (in milliseconds)
    pub fn restart_delay_ms(mut self, ms: u64) -> Self {
        self.config.restart_delay_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
