//! Destination prefixes in CIDR notation.

use crate::{AddressFamily, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// A destination prefix: network address plus length (e.g. `10.4.0.0/16`).
///
/// Serializes as its CIDR string, which is also how the dump collaborator
/// prints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RoutePrefix {
    address: IpAddr,
    length: u8,
}

impl RoutePrefix {
    /// Creates a prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is invalid for the address family
    /// (>32 for IPv4, >128 for IPv6).
    pub fn new(address: IpAddr, length: u8) -> Result<Self, ParseError> {
        let max_len = match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };

        if length > max_len {
            return Err(ParseError::InvalidPrefix(format!(
                "prefix length {} exceeds maximum {} for address type",
                length, max_len
            )));
        }

        Ok(RoutePrefix { address, length })
    }

    /// Returns the network address of this prefix.
    pub const fn address(&self) -> IpAddr {
        self.address
    }

    /// Returns the prefix length in bits.
    pub const fn length(&self) -> u8 {
        self.length
    }

    /// Returns the address family implied by the network address.
    pub const fn family(&self) -> AddressFamily {
        match self.address {
            IpAddr::V4(_) => AddressFamily::Inet,
            IpAddr::V6(_) => AddressFamily::Inet6,
        }
    }
}

impl fmt::Display for RoutePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.length)
    }
}

impl FromStr for RoutePrefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, len_str) = s
            .rsplit_once('/')
            .ok_or_else(|| ParseError::InvalidPrefix(s.to_string()))?;

        let address: IpAddr = addr_str
            .parse()
            .map_err(|_| ParseError::InvalidAddress(addr_str.to_string()))?;
        let length: u8 = len_str
            .parse()
            .map_err(|_| ParseError::InvalidPrefix(s.to_string()))?;

        RoutePrefix::new(address, length)
    }
}

impl From<RoutePrefix> for String {
    fn from(prefix: RoutePrefix) -> Self {
        prefix.to_string()
    }
}

impl TryFrom<String> for RoutePrefix {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
