//! Edge table with provenance-label merging

use super::node::NodeId;
use serde::Serialize;
use std::collections::HashMap;

/// Separator between merged provenance labels, consumed verbatim by the
/// downstream graph viewers.
pub const LABEL_SEPARATOR: &str = "<br/>";

/// A resolved redirect, collapsed to the export depth.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Accumulated `file:line` provenance; empty for synthetic return edges.
    pub label: String,
}

/// Deduplicated edges keyed by (source, target) at the export depth.
/// Insertion order is preserved so serialization is stable across runs.
#[derive(Debug, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    index: HashMap<(NodeId, NodeId), usize>,
}

impl EdgeTable {
    /// Insert an edge, or merge `label` into the existing edge for the same
    /// (source, target) pair.
    pub fn insert(&mut self, source: NodeId, target: NodeId, label: &str) {
        match self.index.get(&(source, target)) {
            Some(&i) => {
                if !label.is_empty() {
                    let existing = &mut self.edges[i].label;
                    if !existing.is_empty() {
                        existing.push_str(LABEL_SEPARATOR);
                    }
                    existing.push_str(label);
                }
            }
            None => {
                self.index.insert((source, target), self.edges.len());
                self.edges.push(Edge {
                    source,
                    target,
                    label: label.to_string(),
                });
            }
        }
    }

    /// Edges in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> NodeId {
        NodeId::new(raw)
    }

    #[test]
    fn repeated_pair_merges_labels() {
        let mut table = EdgeTable::default();
        table.insert(id(1), id(2), "story.ink:4");
        table.insert(id(1), id(2), "story.ink:9");

        assert_eq!(table.len(), 1);
        let edge = table.iter().next().unwrap();
        assert_eq!(edge.label, "story.ink:4<br/>story.ink:9");
    }

    #[test]
    fn distinct_pairs_stay_distinct() {
        let mut table = EdgeTable::default();
        table.insert(id(1), id(2), "a:1");
        table.insert(id(2), id(1), "a:2");

        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_label_never_appends_separator() {
        let mut table = EdgeTable::default();
        table.insert(id(1), id(2), "");
        table.insert(id(1), id(2), "");
        let edge = table.iter().next().unwrap();
        assert_eq!(edge.label, "");

        // A later labeled occurrence fills the empty slot without a leading
        // separator.
        table.insert(id(1), id(2), "a:3");
        let edge = table.iter().next().unwrap();
        assert_eq!(edge.label, "a:3");
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut table = EdgeTable::default();
        table.insert(id(3), id(4), "x");
        table.insert(id(1), id(2), "y");
        let pairs: Vec<_> = table.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(pairs, vec![(id(3), id(4)), (id(1), id(2))]);
    }
}
