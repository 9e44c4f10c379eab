//! Node registry: identity allocation, path index, duplication

use super::node::{Node, NodeId, NodeKind};
use crate::settings::{ExportDepth, GraphSettings};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Owns every discovered node. The integer id is the identity; the path is a
/// secondary index that always points at the first (non-duplicated) node
/// registered for that path.
#[derive(Debug)]
pub struct NodeRegistry {
    nodes: BTreeMap<NodeId, Node>,
    by_path: HashMap<String, NodeId>,
    exclude_paths: HashSet<String>,
    force_tunnel_paths: HashSet<String>,
    next_id: u32,
}

impl NodeRegistry {
    pub fn new(settings: &GraphSettings) -> Self {
        Self {
            nodes: BTreeMap::new(),
            by_path: HashMap::new(),
            exclude_paths: settings.exclude_paths.clone(),
            force_tunnel_paths: settings.force_tunnel_paths.clone(),
            next_id: 1,
        }
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Look up the node registered for `path`, creating it if absent. The
    /// first registration of a path wins; a later call with a different kind
    /// returns the existing node untouched.
    pub fn get_or_create(&mut self, kind: NodeKind, path: &str) -> NodeId {
        if let Some(&id) = self.by_path.get(path) {
            return id;
        }
        let id = self.fresh_id();
        let mut node = Node::new(kind, id, path);
        node.is_excluded = self.exclude_paths.contains(path);
        node.is_tunnel = self.force_tunnel_paths.contains(path);
        self.by_path.insert(path.to_string(), id);
        self.nodes.insert(id, node);
        id
    }

    /// Clone the node under a fresh identity. The duplicate is reachable by
    /// id only; the path index keeps pointing at the original.
    pub fn duplicate(&mut self, id: NodeId) -> NodeId {
        let fresh = self.fresh_id();
        match self.nodes.get(&id) {
            Some(original) => {
                let dup = original.duplicate(fresh);
                self.nodes.insert(fresh, dup);
            }
            None => {
                tracing::warn!(%id, "duplicate requested for unknown node id");
            }
        }
        fresh
    }

    /// The id registered for a symbolic path, if any.
    pub fn id_for_path(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// The id that represents `id` at the given export depth: the enclosing
    /// knot, the enclosing stitch (a knot stands for itself), or `id`
    /// unchanged at full depth.
    pub fn resolve_at_depth(&self, id: NodeId, depth: ExportDepth) -> NodeId {
        self.nodes.get(&id).map_or(id, |n| n.id_at_depth(depth))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Nodes in ascending id order, which is creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
