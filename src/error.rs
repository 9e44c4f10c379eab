//! Crate error type

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading scripts, parsing settings, or writing
/// the export. Graph construction itself never fails; unresolvable
/// references are logged and skipped.
#[derive(Debug, Error)]
pub enum InkGraphError {
    #[error("failed to read script '{path}': {source}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read settings '{path}': {source}")]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings '{path}': {source}")]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write export '{path}': {source}")]
    WriteExport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for inkgraph operations
pub type InkGraphResult<T> = Result<T, InkGraphError>;
