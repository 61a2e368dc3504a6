//! FSW UDP Server
//!
//! Receives command datagrams and answers them from the simulated FSW.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{GcsError, Result};
use crate::fsw::FlightSoftware;
use crate::protocol::RECV_BUFFER_SIZE;

/// Consecutive receive failures tolerated before `run` gives up
pub const MAX_RECV_FAILURES: u32 = 10;

/// Counts consecutive receive failures; any successful poll resets it
#[derive(Debug, Default)]
struct FailureStreak {
    count: u32,
}

impl FailureStreak {
    fn reset(&mut self) {
        self.count = 0;
    }

    /// Record a failure; true once the limit is reached
    fn record(&mut self) -> bool {
        self.count += 1;
        self.count >= MAX_RECV_FAILURES
    }
}

/// UDP server for the simulated FSW
pub struct FswServer {
    socket: UdpSocket,

    /// Receive timeout, also the backoff after a failed receive
    poll_timeout: Duration,

    /// Simulator state, shared so the owner can inspect it while running
    fsw: Arc<Mutex<FlightSoftware>>,

    /// Set to stop the receive loop at the next poll
    shutdown: Arc<AtomicBool>,
}

impl FswServer {
    /// Bind the listen address and start the FSW in RESTARTING
    pub fn bind(config: &Config) -> Result<Self> {
        config.validate()?;

        let socket = UdpSocket::bind(&config.listen_addr).map_err(GcsError::Socket)?;
        socket
            .set_read_timeout(Some(config.poll_timeout()))
            .map_err(GcsError::Socket)?;

        tracing::info!("Established command interface on {}", socket.local_addr()?);

        Ok(Self {
            socket,
            poll_timeout: config.poll_timeout(),
            fsw: Arc::new(Mutex::new(FlightSoftware::new(config.restart_delay()))),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Run the main loop (blocking)
    ///
    /// Returns after SHUTDOWN has been answered or the shutdown flag is set.
    /// Fails after `MAX_RECV_FAILURES` receive errors in a row.
    pub fn run(&self) -> Result<()> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let mut failures = FailureStreak::default();

        while !self.shutdown.load(Ordering::Relaxed) {
            self.fsw.lock().tick();

            let (len, client) = match self.socket.recv_from(&mut buf) {
                Ok(received) => {
                    failures.reset();
                    received
                }
                Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    failures.reset();
                    continue;
                }
                Err(e) => {
                    if failures.record() {
                        tracing::error!("Receive failed {} times in a row: {}", failures.count, e);
                        return Err(e.into());
                    }
                    tracing::warn!("Receive failed: {}", e);
                    thread::sleep(self.poll_timeout);
                    continue;
                }
            };

            if len == 0 {
                tracing::warn!("Ignoring empty datagram from {}", client);
                continue;
            }

            let (reply, finished) = {
                let mut fsw = self.fsw.lock();
                let reply = fsw.handle(buf[0]);
                (reply, fsw.is_shutdown())
            };

            if let Err(e) = self.socket.send_to(&reply.bytes, client) {
                tracing::warn!("Error replying to {}: {}", client, e);
            }

            if finished {
                self.shutdown.store(true, Ordering::Relaxed);
            }
        }

        tracing::info!("FSW stopped");
        Ok(())
    }

    /// Signal the server to stop at the next poll
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Flag that stops the server when set, for use from another thread
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Shared handle to the simulator state
    pub fn fsw(&self) -> Arc<Mutex<FlightSoftware>> {
        Arc::clone(&self.fsw)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}
