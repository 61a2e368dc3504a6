//! Peer Address
//!
//! Parsing of operator-supplied `host:port` strings.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use crate::error::AddressError;

/// Address of the FSW, fixed for the lifetime of a channel use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerAddress(SocketAddrV4);

impl PeerAddress {
    /// Fallback when the operator gives nothing usable
    pub const DEFAULT: PeerAddress = PeerAddress(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8080));

    pub fn new(host: Ipv4Addr, port: u16) -> Self {
        Self(SocketAddrV4::new(host, port))
    }

    /// Parse `xxx.xxx.xxx.xxx:port`
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let input = input.trim();
        let (host, port) = input
            .rsplit_once(':')
            .ok_or_else(|| AddressError::MissingPort(input.to_string()))?;

        let host = Ipv4Addr::from_str(host.trim())
            .map_err(|_| AddressError::BadHost(host.to_string()))?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| AddressError::BadPort(port.to_string()))?;

        Ok(Self::new(host, port))
    }

    /// Parse, falling back to [`PeerAddress::DEFAULT`]
    ///
    /// The error is returned alongside so the caller can tell the operator
    /// why the default was used.
    pub fn parse_or_default(input: &str) -> (Self, Option<AddressError>) {
        match Self::parse(input) {
            Ok(addr) => (addr, None),
            Err(e) => (Self::DEFAULT, Some(e)),
        }
    }

    pub fn host(&self) -> Ipv4Addr {
        *self.0.ip()
    }

    pub fn port(&self) -> u16 {
        self.0.port()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(self.0)
    }
}

impl Default for PeerAddress {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<SocketAddrV4> for PeerAddress {
    fn from(addr: SocketAddrV4) -> Self {
        Self(addr)
    }
}

impl FromStr for PeerAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
