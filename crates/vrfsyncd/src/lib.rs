//! Per-VRF routing table synchronization.
//!
//! Keeps per-domain routing tables synchronized between the dataplane's
//! route toolkit and a topology store. Domains are created lazily from a
//! bulk snapshot (`rt --dump`), kept current from the toolkit's JSON-line
//! monitor stream (`rt --monitor`) and from interface-lifecycle
//! notifications, and garbage-collected when their last member interface
//! goes away. Every mutation flows through one ordered queue with a single
//! consumer, which publishes the affected domain's route list to the
//! topology store after each applied record.

pub mod config;
pub mod error;
pub mod monitor;
pub mod publisher;
pub mod snapshot;
pub mod table;
pub mod topology;
pub mod update;
pub mod updater;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use monitor::{run_monitor, spawn_monitor, MonitorRecord};
pub use publisher::Publisher;
pub use snapshot::{parse_dump, RouteDump, RtDump};
pub use table::{Vrf, VrfTable};
pub use topology::{Entity, GraphView, TopologyGraph};
pub use update::{channel, RouteUpdate, SyncHandle};
pub use updater::{RouteTableUpdater, SyncStats};
