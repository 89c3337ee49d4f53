//! The update serializer: single consumer of the update queue.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};
use vrfsync_types::{Route, VrfId};

use crate::publisher::Publisher;
use crate::snapshot::{parse_dump, RouteDump};
use crate::table::{Vrf, VrfTable};
use crate::update::RouteUpdate;

/// Counters kept by the serializer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub routes_added: u64,
    pub routes_removed: u64,
    /// Deletes whose prefix matched nothing.
    pub route_del_misses: u64,
    pub interfaces_added: u64,
    pub interfaces_removed: u64,
    pub vrfs_created: u64,
    pub vrfs_deleted: u64,
    pub snapshots_loaded: u64,
    pub snapshot_failures: u64,
    pub publishes: u64,
}

/// Applies queued update records one at a time, publishing the affected
/// domain after each.
///
/// Owns the domain table outright. Callers interact only through the
/// queue, so ordering of concurrent producers is settled at enqueue time
/// and nothing here needs a lock.
pub struct RouteTableUpdater<D> {
    vrfs: VrfTable,
    dump: D,
    publisher: Publisher,
    rx: UnboundedReceiver<RouteUpdate>,
    stats: SyncStats,
}

impl<D: RouteDump> RouteTableUpdater<D> {
    pub fn new(dump: D, publisher: Publisher, rx: UnboundedReceiver<RouteUpdate>) -> Self {
        RouteTableUpdater {
            vrfs: VrfTable::new(),
            dump,
            publisher,
            rx,
            stats: SyncStats::default(),
        }
    }

    /// Consumes the queue until every producer is gone, then returns the
    /// final counters.
    pub async fn run(mut self) -> SyncStats {
        info!("update serializer running");
        while let Some(update) = self.rx.recv().await {
            self.apply(update).await;
        }
        info!("update queue closed, serializer stopping");
        self.stats
    }

    /// Applies one record, then publishes the affected domain. The only
    /// record that can fail to resolve a domain is an interface delete for
    /// an interface no domain contains; that one skips the publish.
    pub async fn apply(&mut self, update: RouteUpdate) {
        let affected = match update {
            RouteUpdate::AddRoute { vrf_id, route } => {
                self.add_route(vrf_id, route).await;
                Some(vrf_id)
            }
            RouteUpdate::DelRoute { vrf_id, route } => {
                self.del_route(vrf_id, route).await;
                Some(vrf_id)
            }
            RouteUpdate::AddInterface { vrf_id, interface } => {
                self.add_interface(vrf_id, &interface).await;
                Some(vrf_id)
            }
            RouteUpdate::DelInterface { interface } => self.del_interface(&interface),
        };

        match affected {
            Some(vrf_id) => self.publish(vrf_id).await,
            None => debug!("no domain resolved, skipping publish"),
        }
    }

    /// Current counters.
    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Looks up a domain entry.
    pub fn vrf(&self, vrf_id: VrfId) -> Option<&Vrf> {
        self.vrfs.get(vrf_id)
    }

    /// Number of live domains.
    pub fn vrf_count(&self) -> usize {
        self.vrfs.len()
    }

    /// Ensures `vrf_id` exists, creating it and loading its snapshot on
    /// first reference.
    async fn ensure_vrf(&mut self, vrf_id: VrfId) {
        if self.vrfs.contains(vrf_id) {
            return;
        }
        info!(vrf_id, "first reference to domain, creating");
        self.vrfs.insert_empty(vrf_id);
        self.stats.vrfs_created += 1;
        self.load_snapshot(vrf_id).await;
    }

    /// Bulk-loads the domain's current routes from the dump source. A dump
    /// failure leaves the domain in place, possibly empty.
    async fn load_snapshot(&mut self, vrf_id: VrfId) {
        let output = match self.dump.dump(vrf_id).await {
            Ok(output) => output,
            Err(e) => {
                error!(vrf_id, error = %e, "routing table dump failed, domain starts empty");
                self.stats.snapshot_failures += 1;
                return;
            }
        };

        if let Some(vrf) = self.vrfs.get_mut(vrf_id) {
            let mut loaded = 0usize;
            for route in parse_dump(&output) {
                if vrf.add_route(route) {
                    loaded += 1;
                }
            }
            self.stats.snapshots_loaded += 1;
            debug!(vrf_id, loaded, "snapshot loaded");
        }
    }

    async fn add_route(&mut self, vrf_id: VrfId, route: Route) {
        self.ensure_vrf(vrf_id).await;
        if let Some(vrf) = self.vrfs.get_mut(vrf_id) {
            if vrf.add_route(route) {
                self.stats.routes_added += 1;
                debug!(vrf_id, prefix = %route.prefix, nexthop = route.nexthop_id, "route added");
            } else {
                debug!(vrf_id, prefix = %route.prefix, "route already present");
            }
        }
    }

    async fn del_route(&mut self, vrf_id: VrfId, route: Route) {
        self.ensure_vrf(vrf_id).await;
        if let Some(vrf) = self.vrfs.get_mut(vrf_id) {
            match vrf.del_route(&route.prefix) {
                Some(removed) => {
                    self.stats.routes_removed += 1;
                    debug!(vrf_id, prefix = %removed.prefix, "route removed");
                }
                None => {
                    self.stats.route_del_misses += 1;
                    warn!(vrf_id, prefix = %route.prefix, "no route matches prefix, nothing deleted");
                }
            }
        }
    }

    async fn add_interface(&mut self, vrf_id: VrfId, interface: &str) {
        self.ensure_vrf(vrf_id).await;
        if let Some(vrf) = self.vrfs.get_mut(vrf_id) {
            vrf.add_interface(interface);
            self.stats.interfaces_added += 1;
            debug!(vrf_id, interface, "interface joined domain");
        }
    }

    /// Removes one membership occurrence of `interface` from the domain
    /// that holds it, deleting the domain when its membership empties.
    /// Returns the affected domain, or `None` when no domain knows the
    /// interface.
    fn del_interface(&mut self, interface: &str) -> Option<VrfId> {
        let vrf_id = match self.vrfs.find_interface(interface) {
            Some(vrf_id) => vrf_id,
            None => {
                warn!(interface, "interface not found in any domain");
                return None;
            }
        };

        if let Some(vrf) = self.vrfs.get_mut(vrf_id) {
            vrf.del_interface(interface);
            self.stats.interfaces_removed += 1;
            debug!(vrf_id, interface, "interface left domain");
            if vrf.has_no_members() {
                self.vrfs.remove(vrf_id);
                self.stats.vrfs_deleted += 1;
                info!(vrf_id, "domain membership empty, deleting");
            }
        }

        Some(vrf_id)
    }

    /// Publishes the domain's current route list. Goes through the same
    /// ensure-exists path as everything else, so publishing a domain that
    /// was just deleted recreates it fresh via snapshot reload.
    async fn publish(&mut self, vrf_id: VrfId) {
        self.ensure_vrf(vrf_id).await;
        let routes = match self.vrfs.get(vrf_id) {
            Some(vrf) => vrf.routes.clone(),
            None => Vec::new(),
        };
        self.publisher.publish(vrf_id, &routes);
        self.stats.publishes += 1;
    }
}
