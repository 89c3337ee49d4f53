//! Address-family tags with safe parsing.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address family of a route, using the dataplane's `AF_*` naming on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    #[serde(rename = "AF_INET")]
    Inet,
    #[serde(rename = "AF_INET6")]
    Inet6,
}

impl AddressFamily {
    /// Returns the wire name of this family.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::Inet => "AF_INET",
            AddressFamily::Inet6 => "AF_INET6",
        }
    }

    /// Returns true if this is the IPv4 family.
    pub const fn is_inet(&self) -> bool {
        matches!(self, AddressFamily::Inet)
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressFamily {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AF_INET" => Ok(AddressFamily::Inet),
            "AF_INET6" => Ok(AddressFamily::Inet6),
            _ => Err(ParseError::InvalidFamily(s.to_string())),
        }
    }
}
