//! Common typed primitives for VRF route synchronization.
//!
//! This crate provides type-safe representations of the routing primitives
//! shared across the synchronizer:
//!
//! - [`AddressFamily`]: address-family tags (`AF_INET`, `AF_INET6`)
//! - [`RoutePrefix`]: destination prefixes in CIDR notation
//! - [`Route`]: the route value carried through the synchronizer

mod family;
mod prefix;
mod route;

pub use family::AddressFamily;
pub use prefix::RoutePrefix;
pub use route::{Route, ROUTE_PROTOCOL};

/// Numeric identifier of a routing domain (VRF) inside the dataplane.
pub type VrfId = u32;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IP address format: {0}")]
    InvalidAddress(String),

    #[error("invalid prefix format: {0}")]
    InvalidPrefix(String),

    #[error("invalid address family: {0}")]
    InvalidFamily(String),
}
