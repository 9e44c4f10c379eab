//! End-to-end export pipeline: collect files, build, render, write

use crate::error::{InkGraphError, InkGraphResult};
use crate::graph::{GraphBuilder, StoryGraph};
use crate::settings::GraphSettings;
use crate::source;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Build the story graph for a root script and its includes.
pub fn build_graph(root: &Path, settings: &GraphSettings) -> InkGraphResult<StoryGraph> {
    let files = source::collect_script_files(root)?;
    Ok(GraphBuilder::new(settings.clone()).build(&files))
}

/// Where the TGF text for `root` lands. An `export_path` ending in `.tgf`
/// is used verbatim; anything else is treated as a directory and the root
/// script's stem decides the file name.
pub fn export_file_path(settings: &GraphSettings, root: &Path) -> PathBuf {
    let configured = &settings.export_path;
    if configured.extension().is_some_and(|ext| ext == "tgf") {
        return configured.clone();
    }
    let stem = root
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string());
    configured.join(format!("{stem}.tgf"))
}

/// Build the graph and write its TGF rendering, creating missing parent
/// directories. Returns the written path.
pub fn export_graph(root: &Path, settings: &GraphSettings) -> InkGraphResult<PathBuf> {
    let graph = build_graph(root, settings)?;
    let text = graph.to_tgf();

    let out = export_file_path(settings, root);
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| InkGraphError::WriteExport {
                path: out.clone(),
                source,
            })?;
        }
    }
    fs::write(&out, text).map_err(|source| InkGraphError::WriteExport {
        path: out.clone(),
        source,
    })?;

    info!(
        path = %out.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "exported story graph"
    );
    Ok(out)
}
