//! Graph export configuration

use crate::error::{InkGraphError, InkGraphResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Granularity at which nodes and edges are collapsed for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportDepth {
    /// Only knots; stitches and labels collapse into their enclosing knot.
    KnotsOnly,
    /// Knots and stitches; labels collapse into their enclosing stitch.
    KnotsAndStitches,
    /// Knots, stitches, and labels.
    Full,
}

/// Policy for nodes entered via a tunnel call (`->->`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TunnelHandling {
    /// Export tunnel nodes like any other node.
    Keep,
    /// Omit tunnel nodes and every edge touching them.
    Remove,
    /// Clone the tunnel destination per caller so each call site gets a
    /// distinct return path in the exported graph.
    Duplicate,
}

/// Configuration for a graph export run.
///
/// Deserializes from JSON with every field optional; absent fields take the
/// defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Node collapsing granularity.
    pub export_depth: ExportDepth,
    /// Tunnel node policy.
    pub tunnel_handling: TunnelHandling,
    /// File or directory the TGF text is written to. A path not ending in
    /// `.tgf` is treated as a directory and `<root-stem>.tgf` is appended.
    pub export_path: PathBuf,
    /// Symbolic paths omitted entirely from the output.
    pub exclude_paths: HashSet<String>,
    /// Symbolic paths always treated as tunnel targets, with or without a
    /// `->->` marker in the script.
    pub force_tunnel_paths: HashSet<String>,
    /// Symbolic paths that get a fresh duplicate node per distinct incoming
    /// source, independent of the tunnel policy.
    pub force_duplicate_paths: HashSet<String>,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            export_depth: ExportDepth::Full,
            tunnel_handling: TunnelHandling::Keep,
            export_path: PathBuf::from("exports"),
            exclude_paths: HashSet::new(),
            force_tunnel_paths: HashSet::new(),
            force_duplicate_paths: HashSet::new(),
        }
    }
}

impl GraphSettings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> InkGraphResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| InkGraphError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| InkGraphError::ParseSettings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set the export depth.
    pub fn with_depth(mut self, depth: ExportDepth) -> Self {
        self.export_depth = depth;
        self
    }

    /// Set the tunnel policy.
    pub fn with_tunnels(mut self, handling: TunnelHandling) -> Self {
        self.tunnel_handling = handling;
        self
    }

    /// Exclude a symbolic path from the output.
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.exclude_paths.insert(path.into());
        self
    }

    /// Force a symbolic path to be treated as a tunnel target.
    pub fn force_tunnel(mut self, path: impl Into<String>) -> Self {
        self.force_tunnel_paths.insert(path.into());
        self
    }

    /// Force a symbolic path to be duplicated per incoming source.
    pub fn force_duplicate(mut self, path: impl Into<String>) -> Self {
        self.force_duplicate_paths.insert(path.into());
        self
    }
}
