//! Node representation in the story graph

use crate::settings::ExportDepth;
use serde::Serialize;

/// Unique identifier for a node, assigned monotonically during the scan.
/// Identity within the full-depth graph; duplicated nodes share a path but
/// never an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw integer value as it appears in the export.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural kind of a node, coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// Top-level named section (`== name`)
    Knot,
    /// Named sub-section within a knot (`= name`)
    Stitch,
    /// Named choice or gather marker (`* (name)`)
    Label,
}

/// A knot, stitch, or label discovered during the scan.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// Unique identity, stable for the lifetime of the graph.
    pub id: NodeId,
    /// Structural kind.
    pub kind: NodeKind,
    /// Fully-qualified symbolic name, e.g. `chapter1.intro`.
    pub path: String,
    /// Id of the enclosing knot (itself, for a knot).
    pub knot_id: NodeId,
    /// Id of the enclosing stitch, or the enclosing knot when no stitch
    /// encloses this node.
    pub stitch_id: NodeId,
    /// Entered via a tunnel call, or configured as a forced tunnel.
    pub is_tunnel: bool,
    /// Already served as an edge target; drives duplication-on-reuse.
    pub is_used: bool,
    /// Matches the configured exclusion list; never exported.
    pub is_excluded: bool,
}

impl Node {
    /// New node anchored to itself. Callers re-point `knot_id`/`stitch_id`
    /// for stitches and labels once the enclosing context is known.
    pub(crate) fn new(kind: NodeKind, id: NodeId, path: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            path: path.into(),
            knot_id: id,
            stitch_id: id,
            is_tunnel: false,
            is_used: false,
            is_excluded: false,
        }
    }

    /// Shallow copy under a fresh id. A node that anchors itself (its own
    /// knot or stitch) re-anchors the duplicate; otherwise the duplicate
    /// keeps the original's anchors so depth collapsing still lands on the
    /// shared enclosing node.
    pub(crate) fn duplicate(&self, id: NodeId) -> Self {
        Self {
            id,
            kind: self.kind,
            path: self.path.clone(),
            knot_id: if self.knot_id == self.id { id } else { self.knot_id },
            stitch_id: if self.stitch_id == self.id { id } else { self.stitch_id },
            is_tunnel: self.is_tunnel,
            is_used: false,
            is_excluded: self.is_excluded,
        }
    }

    /// The id that represents this node at the given export depth.
    pub fn id_at_depth(&self, depth: ExportDepth) -> NodeId {
        match depth {
            ExportDepth::KnotsOnly => self.knot_id,
            ExportDepth::KnotsAndStitches => {
                if self.kind == NodeKind::Knot {
                    self.id
                } else {
                    self.stitch_id
                }
            }
            ExportDepth::Full => self.id,
        }
    }

    /// Whether this node belongs in the node list at the given depth.
    pub fn is_at_depth(&self, depth: ExportDepth) -> bool {
        match depth {
            ExportDepth::KnotsOnly => self.kind == NodeKind::Knot,
            ExportDepth::KnotsAndStitches => self.kind != NodeKind::Label,
            ExportDepth::Full => true,
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} '{}'", self.kind, self.path)
    }
}
