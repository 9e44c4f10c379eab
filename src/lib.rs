//! Inkgraph: structural graph exporter for ink narrative scripts
//!
//! Scans a set of ink script files and builds a directed graph of their
//! named structure, serialized to the TGF-style node/edge text format that
//! graph viewers consume.
//!
//! # Core Concepts
//!
//! - **Knots / Stitches / Labels**: named structural units, coarse to fine
//! - **Redirects**: `-> target` references, resolved into edges with
//!   `file:line` provenance labels
//! - **Tunnels**: `->->` call-and-return destinations; duplication policy
//!   can clone them per caller so each call site keeps a distinct return path
//! - **Export depth**: collapses the graph to knots, knots+stitches, or the
//!   full structure
//!
//! # Example
//!
//! ```
//! use inkgraph::{GraphBuilder, GraphSettings, ScriptFile};
//!
//! let file = ScriptFile::from_lines("story.ink", ["== start", "-> END"]);
//! let graph = GraphBuilder::new(GraphSettings::default()).build(&[file]);
//! assert!(graph.to_tgf().contains("2 start"));
//! ```

mod error;
mod export;
mod graph;
mod pattern;
mod settings;
mod source;
mod tgf;

pub use error::{InkGraphError, InkGraphResult};
pub use export::{build_graph, export_file_path, export_graph};
pub use graph::{
    Edge, GraphBuilder, Node, NodeId, NodeKind, StoryGraph, LABEL_SEPARATOR, ROOT_PATH,
};
pub use settings::{ExportDepth, GraphSettings, TunnelHandling};
pub use source::{collect_script_files, ScriptFile};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
