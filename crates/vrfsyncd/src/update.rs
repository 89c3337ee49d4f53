//! Update records and the enqueue side of the update queue.

use tokio::sync::mpsc;
use tracing::warn;
use vrfsync_types::{Route, VrfId};

/// One unit of work for the update serializer.
///
/// Records are applied strictly one at a time, in arrival order; there is
/// no batching and no coalescing.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteUpdate {
    /// Install a route in a domain.
    AddRoute { vrf_id: VrfId, route: Route },
    /// Remove the route for this prefix from a domain.
    DelRoute { vrf_id: VrfId, route: Route },
    /// An interface joined a domain.
    AddInterface { vrf_id: VrfId, interface: String },
    /// An interface went away; the owning domain is resolved during apply.
    DelInterface { interface: String },
}

/// Clonable enqueue handle.
///
/// Every method is fire-and-forget: it enqueues and returns immediately,
/// never blocking and never reporting back to the caller.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<RouteUpdate>,
}

impl SyncHandle {
    /// Notifies the synchronizer that `interface` joined domain `vrf_id`.
    pub fn on_interface_added(&self, vrf_id: VrfId, interface: impl Into<String>) {
        self.send(RouteUpdate::AddInterface {
            vrf_id,
            interface: interface.into(),
        });
    }

    /// Notifies the synchronizer that `interface` went away. The domain it
    /// belonged to is discovered during apply.
    pub fn on_interface_deleted(&self, interface: impl Into<String>) {
        self.send(RouteUpdate::DelInterface {
            interface: interface.into(),
        });
    }

    /// Enqueues any update record.
    pub fn send(&self, update: RouteUpdate) {
        if self.tx.send(update).is_err() {
            warn!("update queue is closed, dropping record");
        }
    }
}

/// Creates the update queue, returning the enqueue handle and the
/// serializer's receiving end.
pub fn channel() -> (SyncHandle, mpsc::UnboundedReceiver<RouteUpdate>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SyncHandle { tx }, rx)
}
