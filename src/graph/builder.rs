//! Two-pass graph construction over an ordered set of script files
//!
//! Pass 1 walks every line of every file and registers knots, stitches, and
//! labels, plus tunnel markers. Pass 2 re-walks the files with the scan
//! cursor reset per file and resolves redirects into edges; by then every
//! legal target is registered, so resolution never has to look ahead.

use super::edge::EdgeTable;
use super::node::{NodeId, NodeKind};
use super::registry::NodeRegistry;
use super::StoryGraph;
use crate::pattern::{self, LineMatch};
use crate::settings::{GraphSettings, TunnelHandling};
use crate::source::ScriptFile;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Synthetic origin for anything encountered before the first knot header.
pub const ROOT_PATH: &str = "<root>";

/// Reserved end-of-story diverts, registered unconditionally so `-> DONE`
/// and `-> END` always resolve.
const TERMINAL_KNOTS: [&str; 2] = ["DONE", "END"];

/// Scan cursor carried across the lines of one pass.
///
/// `stitch_id` survives knot headers and file boundaries; it only moves on
/// the next stitch header.
#[derive(Debug)]
struct ScanContext {
    /// Symbolic name of the current knot.
    knot: String,
    knot_id: NodeId,
    /// Last stitch header seen, if any.
    stitch_id: Option<NodeId>,
    /// Full path of the most recently entered node; redirect edges
    /// originate here.
    path: String,
    /// Most recently entered node; tunnel markers attribute to its
    /// stitch-level owner.
    node: Option<NodeId>,
}

/// Drives the two scanning passes and owns all graph state while it is
/// still mutable.
pub struct GraphBuilder {
    settings: GraphSettings,
    registry: NodeRegistry,
    edges: EdgeTable,
    /// `source.path->target.path` keys of tunnel calls already materialized,
    /// mapped to the (possibly duplicated) node that serves that caller.
    duplicated_tunnels: HashMap<String, NodeId>,
    /// Same bookkeeping for force-duplicated targets.
    forced_duplicates: HashMap<String, NodeId>,
    ctx: ScanContext,
}

impl GraphBuilder {
    pub fn new(settings: GraphSettings) -> Self {
        let mut registry = NodeRegistry::new(&settings);
        let root = registry.get_or_create(NodeKind::Knot, ROOT_PATH);
        let ctx = ScanContext {
            knot: ROOT_PATH.to_string(),
            knot_id: root,
            stitch_id: None,
            path: ROOT_PATH.to_string(),
            node: Some(root),
        };
        Self {
            settings,
            registry,
            edges: EdgeTable::default(),
            duplicated_tunnels: HashMap::new(),
            forced_duplicates: HashMap::new(),
            ctx,
        }
    }

    /// Build the graph from the ordered, include-expanded file set. File and
    /// line order decide node ids and duplication choices, so the same input
    /// always produces the same output.
    pub fn build(mut self, files: &[ScriptFile]) -> StoryGraph {
        for file in files {
            debug!(file = %file.display_path, lines = file.lines.len(), "discovery pass");
            for line in &file.lines {
                self.discover_line(line);
            }
        }

        for name in TERMINAL_KNOTS {
            self.registry.get_or_create(NodeKind::Knot, name);
        }

        for file in files {
            debug!(file = %file.display_path, "resolution pass");
            self.enter_root();
            for (index, line) in file.lines.iter().enumerate() {
                if pattern::is_comment(line) {
                    continue;
                }
                let provenance = format!("{}:{}", file.display_path, index + 1);
                self.resolve_line(line, &provenance);
            }
        }

        StoryGraph {
            settings: self.settings,
            nodes: self.registry,
            edges: self.edges,
        }
    }

    /// Pass 1: register named nodes and tunnel markers. No edges are created
    /// and the origin path never advances; only the current-node cursor
    /// moves so tunnel markers attribute correctly.
    fn discover_line(&mut self, line: &str) {
        if pattern::is_tunnel_entry(line) {
            self.mark_current_tunnel();
            return;
        }
        match pattern::match_header(line) {
            LineMatch::Knot(name) => self.enter_knot(&name),
            LineMatch::Stitch(name) => self.enter_stitch(&name),
            LineMatch::Label(name) => {
                self.register_label(&name);
            }
            LineMatch::None => {}
        }
    }

    /// Pass 2: same header handling as pass 1 so the origin path always
    /// reflects the node this line's redirects come from, plus edge
    /// resolution. Entering a label also records the implicit edge from the
    /// path that was current just before it.
    fn resolve_line(&mut self, line: &str, provenance: &str) {
        match pattern::match_header(line) {
            LineMatch::Knot(name) => self.enter_knot(&name),
            LineMatch::Stitch(name) => self.enter_stitch(&name),
            LineMatch::Label(name) => {
                let origin = self.ctx.path.clone();
                let label_path = self.register_label(&name);
                self.add_edge(&origin, &label_path, provenance);
                self.ctx.path = label_path;
            }
            LineMatch::None => {}
        }

        for target in pattern::match_redirects(line) {
            let origin = self.ctx.path.clone();
            self.add_edge(&origin, &target, provenance);
        }
    }

    /// A `->->` marker flags the stitch-level owner of the current node as a
    /// tunnel destination.
    fn mark_current_tunnel(&mut self) {
        let Some(current) = self.ctx.node else {
            return;
        };
        let Some(owner) = self.registry.node(current).map(|n| n.stitch_id) else {
            return;
        };
        if let Some(node) = self.registry.node_mut(owner) {
            node.is_tunnel = true;
        }
    }

    fn enter_root(&mut self) {
        self.ctx.knot = ROOT_PATH.to_string();
        self.ctx.path = ROOT_PATH.to_string();
        let id = self.registry.get_or_create(NodeKind::Knot, ROOT_PATH);
        self.ctx.knot_id = id;
        self.ctx.node = Some(id);
    }

    fn enter_knot(&mut self, name: &str) {
        if name == "function" {
            // Function declarations are not knots. The previous context
            // stays current for the lines that follow.
            return;
        }
        let id = self.registry.get_or_create(NodeKind::Knot, name);
        self.ctx.knot = name.to_string();
        self.ctx.path = name.to_string();
        self.ctx.knot_id = id;
        self.ctx.node = Some(id);
    }

    fn enter_stitch(&mut self, name: &str) {
        let path = self.qualified(name);
        let id = self.registry.get_or_create(NodeKind::Stitch, &path);
        if let Some(node) = self.registry.node_mut(id) {
            node.knot_id = self.ctx.knot_id;
        }
        self.ctx.path = path;
        self.ctx.stitch_id = Some(id);
        self.ctx.node = Some(id);
    }

    /// Register a label node under the current knot and point the
    /// current-node cursor at it. Returns the label's full path; advancing
    /// the origin path is the caller's decision (pass 2 only).
    fn register_label(&mut self, name: &str) -> String {
        let path = self.qualified(name);
        let id = self.registry.get_or_create(NodeKind::Label, &path);
        let knot_id = self.ctx.knot_id;
        let stitch_id = self.ctx.stitch_id.unwrap_or(knot_id);
        if let Some(node) = self.registry.node_mut(id) {
            node.knot_id = knot_id;
            node.stitch_id = stitch_id;
        }
        self.ctx.node = Some(id);
        path
    }

    fn qualified(&self, name: &str) -> String {
        if self.ctx.knot.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.ctx.knot, name)
        }
    }

    /// Resolve one redirect into an edge, applying depth collapsing,
    /// exclusion, and the tunnel/duplication policy. Unresolvable redirects
    /// are logged and dropped; they never abort the scan.
    fn add_edge(&mut self, source_path: &str, target_path: &str, provenance: &str) {
        if source_path.is_empty() {
            warn!(provenance, "empty source path for redirect");
            return;
        }
        if target_path.is_empty() {
            warn!(provenance, "empty target path for redirect");
            return;
        }

        let Some(source_id) = self.registry.id_for_path(source_path) else {
            warn!(provenance, path = source_path, "unknown redirect source");
            return;
        };

        // A bare target may be a stitch or label local to the current knot.
        let mut target_path = target_path.to_string();
        if !target_path.contains('.') && !self.ctx.knot.is_empty() {
            let local = format!("{}.{}", self.ctx.knot, target_path);
            if self.registry.id_for_path(&local).is_some() {
                target_path = local;
            }
        }

        let Some(target_id) = self.registry.id_for_path(&target_path) else {
            warn!(provenance, path = %target_path, "unknown redirect target");
            return;
        };

        let depth = self.settings.export_depth;
        let source_id = self.registry.resolve_at_depth(source_id, depth);
        let mut target_id = self.registry.resolve_at_depth(target_id, depth);

        let (source_excluded, source_tunnel, source_key) = match self.registry.node(source_id) {
            Some(n) => (n.is_excluded, n.is_tunnel, n.path.clone()),
            None => return,
        };
        let (target_excluded, target_tunnel, target_used, target_key) =
            match self.registry.node(target_id) {
                Some(n) => (n.is_excluded, n.is_tunnel, n.is_used, n.path.clone()),
                None => return,
            };

        if source_excluded || target_excluded {
            return;
        }
        if self.settings.tunnel_handling == TunnelHandling::Remove
            && (source_tunnel || target_tunnel)
        {
            return;
        }

        let mut tunnel_return = false;

        if self.settings.tunnel_handling == TunnelHandling::Duplicate
            && target_tunnel
            && source_id != target_id
        {
            let key = format!("{}->{}", source_key, target_key);
            if self.duplicated_tunnels.contains_key(&key) {
                // This caller's edge pair was already materialized.
                return;
            }
            target_id = self.reuse_or_duplicate(target_id, target_used);
            self.duplicated_tunnels.insert(key, target_id);
            tunnel_return = true;
        } else if self.settings.force_duplicate_paths.contains(&target_key) {
            let key = format!("{}->{}", source_key, target_key);
            if self.forced_duplicates.contains_key(&key) {
                return;
            }
            target_id = self.reuse_or_duplicate(target_id, target_used);
            self.forced_duplicates.insert(key, target_id);
        }

        self.insert_edge(source_id, target_id, provenance);

        if tunnel_return {
            // The tunnel's implicit return path, unlabeled.
            self.insert_edge(target_id, source_id, "");
        }
    }

    /// First use claims the original target; every later caller gets a
    /// fresh duplicate.
    fn reuse_or_duplicate(&mut self, target: NodeId, already_used: bool) -> NodeId {
        if already_used {
            self.registry.duplicate(target)
        } else {
            if let Some(node) = self.registry.node_mut(target) {
                node.is_used = true;
            }
            target
        }
    }

    fn insert_edge(&mut self, source: NodeId, target: NodeId, label: &str) {
        let depth = self.settings.export_depth;
        let source = self.registry.resolve_at_depth(source, depth);
        let target = self.registry.resolve_at_depth(target, depth);
        self.edges.insert(source, target, label);
    }
}
