//! In-memory topology store.
//!
//! Entities are registered with a name and an optional domain-id tag; the
//! publisher attaches route collections to tagged entities. The production
//! topology backend would slot in behind the same surface.

use std::collections::HashMap;
use vrfsync_types::{Route, VrfId};

/// One topology entity (an interface, typically).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    /// Domain the entity is tagged with, if any.
    pub vrf_id: Option<VrfId>,
    /// Route collection last attached by the publisher.
    pub route_table: Option<Vec<Route>>,
}

/// Shared in-memory topology store.
///
/// All reads and writes go through [`TopologyGraph::lock`]; the returned
/// view holds the store's exclusive lock for its scope.
#[derive(Debug, Default)]
pub struct TopologyGraph {
    entities: parking_lot::Mutex<HashMap<String, Entity>>,
}

impl TopologyGraph {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the store lock for the scope of the returned view.
    pub fn lock(&self) -> GraphView<'_> {
        GraphView {
            entities: self.entities.lock(),
        }
    }
}

/// Exclusive view of the store.
pub struct GraphView<'a> {
    entities: parking_lot::MutexGuard<'a, HashMap<String, Entity>>,
}

impl GraphView<'_> {
    /// Registers an entity, optionally tagged with a domain id. An existing
    /// entity of the same name is replaced.
    pub fn add_entity(&mut self, name: impl Into<String>, vrf_id: Option<VrfId>) {
        self.entities.insert(
            name.into(),
            Entity {
                vrf_id,
                route_table: None,
            },
        );
    }

    /// Removes an entity.
    pub fn remove_entity(&mut self, name: &str) -> Option<Entity> {
        self.entities.remove(name)
    }

    /// Names of every entity tagged with `vrf_id`.
    pub fn entities_with_vrf(&self, vrf_id: VrfId) -> Vec<String> {
        self.entities
            .iter()
            .filter(|(_, entity)| entity.vrf_id == Some(vrf_id))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Replaces `name`'s route collection outright. The previous collection,
    /// if any, is discarded rather than merged.
    pub fn set_route_table(&mut self, name: &str, routes: &[Route]) {
        if let Some(entity) = self.entities.get_mut(name) {
            entity.route_table = Some(routes.to_vec());
        }
    }

    /// Looks up an entity.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no entities are registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(prefix: &str, nexthop_id: u32) -> Route {
        Route::new(prefix.parse().unwrap(), nexthop_id)
    }

    #[test]
    fn test_entities_queried_by_domain_tag() {
        let graph = TopologyGraph::new();
        let mut view = graph.lock();
        view.add_entity("vhost0", Some(2));
        view.add_entity("tap1", Some(2));
        view.add_entity("eth0", None);
        view.add_entity("tap9", Some(3));

        let mut names = view.entities_with_vrf(2);
        names.sort();
        assert_eq!(names, vec!["tap1".to_string(), "vhost0".to_string()]);
        assert!(view.entities_with_vrf(4).is_empty());
    }

    #[test]
    fn test_route_table_attachment_replaces() {
        let graph = TopologyGraph::new();
        let mut view = graph.lock();
        view.add_entity("vhost0", Some(2));

        view.set_route_table("vhost0", &[route("10.0.0.0/24", 5), route("10.1.0.0/24", 6)]);
        view.set_route_table("vhost0", &[route("10.1.0.0/24", 6)]);

        let entity = view.entity("vhost0").unwrap();
        assert_eq!(entity.route_table, Some(vec![route("10.1.0.0/24", 6)]));
    }

    #[test]
    fn test_attached_collection_is_a_copy() {
        let graph = TopologyGraph::new();
        let mut routes = vec![route("10.0.0.0/24", 5)];
        {
            let mut view = graph.lock();
            view.add_entity("vhost0", Some(2));
            view.set_route_table("vhost0", &routes);
        }

        routes.push(route("10.9.0.0/24", 9));

        let view = graph.lock();
        let attached = view.entity("vhost0").unwrap().route_table.as_ref().unwrap();
        assert_eq!(attached.len(), 1);
    }

    #[test]
    fn test_remove_entity() {
        let graph = TopologyGraph::new();
        let mut view = graph.lock();
        view.add_entity("vhost0", Some(2));
        assert_eq!(view.len(), 1);
        assert!(view.remove_entity("vhost0").is_some());
        assert!(view.is_empty());
    }
}
