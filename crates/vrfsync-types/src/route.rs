//! The route value carried through the synchronizer.

use crate::{AddressFamily, RoutePrefix};
use serde::{Deserialize, Serialize};

/// Origin protocol tag stamped on every route this system installs, so the
/// topology store can tell synchronized routes from everything else.
pub const ROUTE_PROTOCOL: u32 = 200;

/// A single route as published into the topology store.
///
/// Equality is full structural equality over all four fields; the table
/// store relies on it for add-idempotence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "Family")]
    pub family: AddressFamily,
    #[serde(rename = "Prefix")]
    pub prefix: RoutePrefix,
    #[serde(rename = "NhId")]
    pub nexthop_id: u32,
    #[serde(rename = "Protocol")]
    pub protocol: u32,
}

impl Route {
    /// Creates a route stamped with [`ROUTE_PROTOCOL`]. The family follows
    /// the prefix address, so it can never disagree with it.
    pub fn new(prefix: RoutePrefix, nexthop_id: u32) -> Self {
        Route {
            family: prefix.family(),
            prefix,
            nexthop_id,
            protocol: ROUTE_PROTOCOL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prefix(s: &str) -> RoutePrefix {
        s.parse().unwrap()
    }

    #[test]
    fn test_route_new_stamps_protocol_and_family() {
        let route = Route::new(prefix("10.0.0.0/24"), 7);
        assert_eq!(route.protocol, ROUTE_PROTOCOL);
        assert_eq!(route.family, AddressFamily::Inet);
        assert_eq!(route.nexthop_id, 7);
    }

    #[test]
    fn test_route_equality_is_structural() {
        let a = Route::new(prefix("10.0.0.0/24"), 7);
        let b = Route::new(prefix("10.0.0.0/24"), 7);
        let c = Route::new(prefix("10.0.0.0/24"), 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_route_wire_encoding() {
        let route = Route::new(prefix("10.4.0.0/16"), 21);
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Family": "AF_INET",
                "Prefix": "10.4.0.0/16",
                "NhId": 21,
                "Protocol": 200,
            })
        );
    }
}
