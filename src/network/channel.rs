//! Command Channel
//!
//! Sends one opcode and waits for at most one reply.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::error::{GcsError, Result};
use crate::network::PeerAddress;
use crate::protocol::{encode_request, Opcode, RECV_BUFFER_SIZE};

/// What came back from one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    /// A datagram arrived (truncated to the receive buffer)
    Reply(Bytes),

    /// Nothing arrived before the timeout; FSW busy or packet lost
    TimedOut,
}

/// UDP channel to the FSW
///
/// ## Usage
/// One request may be in flight at a time. The channel keeps no session
/// state, so callers that share it across threads must serialize access
/// themselves (or open one channel each).
pub struct CommandChannel {
    /// Socket bound to an ephemeral local port, closed on drop
    socket: UdpSocket,

    /// Receive timeout applied to every exchange
    timeout: Duration,
}

impl CommandChannel {
    /// Bind a socket and apply the receive timeout
    ///
    /// Any failure here is a `GcsError::Socket` and is fatal to the caller.
    pub fn open(timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(GcsError::Config("receive timeout must be non-zero".to_string()));
        }

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).map_err(GcsError::Socket)?;
        socket
            .set_read_timeout(Some(timeout))
            .map_err(GcsError::Socket)?;

        if let Ok(local) = socket.local_addr() {
            tracing::debug!("Command channel bound to {} (timeout {:?})", local, timeout);
        }

        Ok(Self { socket, timeout })
    }

    /// Send `opcode` to `peer` and wait for the reply
    ///
    /// Datagrams queued before the send are discarded, and only a datagram
    /// from `peer` counts as the reply. A timeout is an ordinary outcome,
    /// not an error. No retry is made.
    pub fn send_command(&self, peer: &PeerAddress, opcode: Opcode) -> Result<Exchange> {
        self.drain_stale()?;

        let request = encode_request(opcode);
        tracing::debug!("Sending {} (0x{:02x}) to {}", opcode, opcode.as_byte(), peer);

        self.socket.send_to(&request, peer.socket_addr())?;

        let deadline = Instant::now() + self.timeout;
        let mut buf = [0u8; RECV_BUFFER_SIZE];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::debug!("No reply to {} within {:?}", opcode, self.timeout);
                return Ok(Exchange::TimedOut);
            }
            self.socket.set_read_timeout(Some(remaining))?;

            match self.socket.recv_from(&mut buf) {
                Ok((len, from)) if from == peer.socket_addr() => {
                    tracing::trace!("Received {} bytes from {}: {:02x?}", len, from, &buf[..len]);
                    return Ok(Exchange::Reply(Bytes::copy_from_slice(&buf[..len])));
                }
                Ok((len, from)) => {
                    tracing::debug!("Dropping {} bytes from {}, expected {}", len, from, peer);
                }
                // Unix reports an expired read timeout as WouldBlock, Windows as TimedOut
                Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    tracing::debug!("No reply to {} within {:?}", opcode, self.timeout);
                    return Ok(Exchange::TimedOut);
                }
                Err(e) => {
                    tracing::warn!("Receive from {} failed: {}", peer, e);
                    return Err(e.into());
                }
            }
        }
    }

    /// Discard anything already queued, e.g. late replies to timed-out requests
    fn drain_stale(&self) -> Result<()> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        self.socket.set_nonblocking(true)?;

        let drained = loop {
            match self.socket.recv_from(&mut buf) {
                Ok((len, from)) => {
                    tracing::debug!("Discarding stale {} bytes from {}", len, from);
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => break Ok(()),
                // Windows surfaces an earlier ICMP port unreachable here
                Err(ref e) if e.kind() == ErrorKind::ConnectionReset => {
                    tracing::debug!("Discarding queued error: {}", e);
                }
                Err(e) => break Err(e),
            }
        };

        self.socket.set_nonblocking(false)?;
        Ok(drained?)
    }

    /// Local address the socket is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
