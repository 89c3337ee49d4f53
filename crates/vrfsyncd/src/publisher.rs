//! Publishing domain route tables to the topology store.

use std::sync::Arc;
use tracing::debug;
use vrfsync_types::{Route, VrfId};

use crate::topology::TopologyGraph;

/// Writes per-domain route collections to tagged topology entities.
#[derive(Debug, Clone)]
pub struct Publisher {
    graph: Arc<TopologyGraph>,
}

impl Publisher {
    pub fn new(graph: Arc<TopologyGraph>) -> Self {
        Publisher { graph }
    }

    /// Attaches `routes` to every entity tagged with `vrf_id`, replacing
    /// whatever collection each carried. The store lock is held for the
    /// query and all writes, and released when this returns.
    ///
    /// Returns the number of entities updated. Zero is normal: the domain
    /// may simply have no presence in the topology yet.
    pub fn publish(&self, vrf_id: VrfId, routes: &[Route]) -> usize {
        let mut view = self.graph.lock();

        let names = view.entities_with_vrf(vrf_id);
        if names.is_empty() {
            debug!(vrf_id, "no topology entities tagged with domain");
            return 0;
        }

        for name in &names {
            view.set_route_table(name, routes);
        }

        debug!(
            vrf_id,
            entities = names.len(),
            routes = routes.len(),
            "published route table"
        );
        names.len()
    }
}
