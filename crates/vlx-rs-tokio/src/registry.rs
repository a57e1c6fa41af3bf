//! The client's view of the gateway's node table.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use vlx_rs::{DeviceKind, NodeEntry, NodeId};

/// Shared, cheaply clonable handle to the known nodes.
///
/// The discovery layer fills the registry; other components (like the
/// heartbeat) only read it. Accessors copy data out so no lock is ever held
/// across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Arc<RwLock<BTreeMap<NodeId, NodeEntry>>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for `entry.node_id`, returning the previous one.
    pub fn insert(&self, entry: NodeEntry) -> Option<NodeEntry> {
        self.write().insert(entry.node_id, entry)
    }

    pub fn remove(&self, node_id: NodeId) -> Option<NodeEntry> {
        self.write().remove(&node_id)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn get(&self, node_id: NodeId) -> Option<NodeEntry> {
        self.read().get(&node_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All entries, ordered by node id.
    pub fn snapshot(&self) -> Vec<NodeEntry> {
        self.read().values().cloned().collect()
    }

    /// Ids of all nodes whose kind matches `predicate`, in ascending order.
    pub fn ids_where<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DeviceKind) -> bool,
    {
        self.read()
            .values()
            .filter(|entry| predicate(&entry.kind))
            .map(|entry| entry.node_id)
            .collect()
    }

    // Writers only insert or remove whole entries; a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<NodeId, NodeEntry>> {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<NodeId, NodeEntry>> {
        self.nodes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_query_by_kind() {
        let registry = NodeRegistry::new();
        registry.insert(NodeEntry::new(NodeId(4), "Office blind", DeviceKind::Blind));
        registry.insert(NodeEntry::new(NodeId(1), "Kitchen window", DeviceKind::Window));
        registry.insert(NodeEntry::new(NodeId(2), "Bedroom blind", DeviceKind::Blind));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.ids_where(DeviceKind::is_blind), vec![NodeId(2), NodeId(4)]);
        assert!(registry.ids_where(|kind| *kind == DeviceKind::Light).is_empty());
        assert_eq!(registry.get(NodeId(1)).unwrap().name, "Kitchen window");
    }

    #[test]
    fn test_clones_share_entries() {
        let registry = NodeRegistry::new();
        let reader = registry.clone();
        registry.insert(NodeEntry::new(NodeId(9), "Awning", DeviceKind::Awning));

        assert_eq!(reader.snapshot().len(), 1);
        let previous = registry.insert(NodeEntry::new(NodeId(9), "Patio blind", DeviceKind::Blind));
        assert_eq!(previous.unwrap().kind, DeviceKind::Awning);
        assert_eq!(reader.ids_where(DeviceKind::is_blind), vec![NodeId(9)]);

        registry.remove(NodeId(9));
        assert!(reader.is_empty());
    }
}
