//! Node/edge text rendering (TGF)
//!
//! Two sections: one `"{id} {path}"` line per exported node, a lone `#`
//! separator, then `"{source} {target} {label}"` per edge. Downstream graph
//! viewers consume this exact shape, including the `<br/>` markers inside
//! merged edge labels.

use crate::graph::StoryGraph;
use crate::settings::TunnelHandling;
use tracing::warn;

impl StoryGraph {
    /// Render the graph as node/edge interchange text.
    ///
    /// Nodes are skipped when excluded, when their kind does not belong at
    /// the export depth, or when tunnel handling removes tunnel nodes.
    /// Edges whose endpoints no longer resolve to a live node are logged
    /// and dropped, never fatal.
    pub fn to_tgf(&self) -> String {
        let depth = self.settings.export_depth;
        let remove_tunnels = self.settings.tunnel_handling == TunnelHandling::Remove;
        let mut out = String::new();

        for node in self.nodes.iter() {
            if node.is_excluded || !node.is_at_depth(depth) {
                continue;
            }
            if remove_tunnels && node.is_tunnel {
                continue;
            }
            out.push_str(&format!("{} {}\n", node.id, node.path));
        }

        out.push_str("#\n");

        for edge in self.edges.iter() {
            if self.nodes.node(edge.source).is_none() {
                warn!(label = %edge.label, "missing source node for edge");
                continue;
            }
            if self.nodes.node(edge.target).is_none() {
                warn!(label = %edge.label, "missing target node for edge");
                continue;
            }

            let source_id = self.nodes.resolve_at_depth(edge.source, depth);
            let target_id = self.nodes.resolve_at_depth(edge.target, depth);
            let (Some(source), Some(target)) =
                (self.nodes.node(source_id), self.nodes.node(target_id))
            else {
                warn!(label = %edge.label, "edge endpoint lost at export depth");
                continue;
            };

            if source.is_excluded || target.is_excluded {
                continue;
            }
            if remove_tunnels && (source.is_tunnel || target.is_tunnel) {
                continue;
            }

            out.push_str(&format!("{} {} {}\n", source.id, target.id, edge.label));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::GraphBuilder;
    use crate::settings::{GraphSettings, TunnelHandling};
    use crate::source::ScriptFile;

    fn story(lines: &[&str]) -> ScriptFile {
        ScriptFile::from_lines("story.ink", lines.iter().copied())
    }

    #[test]
    fn sections_are_separated_by_a_hash_line() {
        let graph = GraphBuilder::new(GraphSettings::default())
            .build(&[story(&["== start", "-> DONE"])]);
        let text = graph.to_tgf();
        let lines: Vec<_> = text.lines().collect();

        let hash = lines.iter().position(|l| *l == "#").unwrap();
        assert_eq!(&lines[..hash], &["1 <root>", "2 start", "3 DONE", "4 END"]);
        assert_eq!(&lines[hash + 1..], &["2 3 story.ink:2"]);
    }

    #[test]
    fn removed_tunnels_disappear_from_both_sections() {
        let settings = GraphSettings::default().with_tunnels(TunnelHandling::Remove);
        let graph = GraphBuilder::new(settings).build(&[story(&[
            "== hub", "->->", "== start", "-> hub", "-> DONE",
        ])]);
        let text = graph.to_tgf();

        assert!(!text.lines().any(|l| l.ends_with(" hub")));
        // The start -> DONE edge survives; the edge into the tunnel does not.
        assert!(text.contains("3 4 story.ink:5"));
        assert_eq!(text.lines().filter(|l| l.contains("story.ink:4")).count(), 0);
    }

    #[test]
    fn unlabeled_edges_render_with_trailing_space() {
        let settings = GraphSettings::default().with_tunnels(TunnelHandling::Duplicate);
        let graph = GraphBuilder::new(settings).build(&[story(&[
            "== hub", "->->", "== start", "-> hub",
        ])]);
        let text = graph.to_tgf();

        // The synthetic return edge hub -> start has no provenance label.
        assert!(text.contains("2 3 \n"), "return edge missing in:\n{text}");
    }
}
