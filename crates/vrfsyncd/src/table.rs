//! Per-domain routing table store.

use std::collections::HashMap;
use vrfsync_types::{Route, RoutePrefix, VrfId};

/// One routing domain: interface membership plus its current routes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vrf {
    /// Interface identifiers that are members of this domain. Appends are
    /// not deduplicated; deletes remove one occurrence.
    pub interfaces: Vec<String>,
    /// Current routes, unique under full structural equality.
    pub routes: Vec<Route>,
}

impl Vrf {
    /// Adds a route unless an equal one is already present.
    ///
    /// Returns true when the table changed.
    pub fn add_route(&mut self, route: Route) -> bool {
        if self.routes.contains(&route) {
            return false;
        }
        self.routes.push(route);
        true
    }

    /// Removes the first route whose prefix equals `prefix`, regardless of
    /// its next hop or protocol. Returns the removed route.
    pub fn del_route(&mut self, prefix: &RoutePrefix) -> Option<Route> {
        let pos = self.routes.iter().position(|r| r.prefix == *prefix)?;
        Some(self.routes.remove(pos))
    }

    /// Appends an interface to the membership list.
    pub fn add_interface(&mut self, interface: impl Into<String>) {
        self.interfaces.push(interface.into());
    }

    /// Removes one occurrence of `interface` from the membership list.
    ///
    /// Returns true when an occurrence was found.
    pub fn del_interface(&mut self, interface: &str) -> bool {
        match self.interfaces.iter().position(|i| i == interface) {
            Some(pos) => {
                self.interfaces.remove(pos);
                true
            }
            None => false,
        }
    }

    /// True when no interfaces remain in the domain.
    pub fn has_no_members(&self) -> bool {
        self.interfaces.is_empty()
    }
}

/// All live routing domains, keyed by domain id.
///
/// Owned exclusively by the update serializer; no internal locking.
#[derive(Debug, Default)]
pub struct VrfTable {
    vrfs: HashMap<VrfId, Vrf>,
}

impl VrfTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the domain exists.
    pub fn contains(&self, vrf_id: VrfId) -> bool {
        self.vrfs.contains_key(&vrf_id)
    }

    /// Looks up a domain.
    pub fn get(&self, vrf_id: VrfId) -> Option<&Vrf> {
        self.vrfs.get(&vrf_id)
    }

    /// Looks up a domain for mutation.
    pub fn get_mut(&mut self, vrf_id: VrfId) -> Option<&mut Vrf> {
        self.vrfs.get_mut(&vrf_id)
    }

    /// Inserts an empty domain if absent, returning the entry.
    pub fn insert_empty(&mut self, vrf_id: VrfId) -> &mut Vrf {
        self.vrfs.entry(vrf_id).or_default()
    }

    /// Removes a domain outright.
    pub fn remove(&mut self, vrf_id: VrfId) -> Option<Vrf> {
        self.vrfs.remove(&vrf_id)
    }

    /// Finds the domain whose membership contains `interface`, scanning
    /// in unspecified order.
    pub fn find_interface(&self, interface: &str) -> Option<VrfId> {
        self.vrfs
            .iter()
            .find(|(_, vrf)| vrf.interfaces.iter().any(|i| i == interface))
            .map(|(id, _)| *id)
    }

    /// Number of live domains.
    pub fn len(&self) -> usize {
        self.vrfs.len()
    }

    /// True when no domains exist.
    pub fn is_empty(&self) -> bool {
        self.vrfs.is_empty()
    }
}
