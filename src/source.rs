//! Script file loading and include traversal

use crate::error::{InkGraphError, InkGraphResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static INCLUDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^INCLUDE\s+(.+)").unwrap());

/// One ink source file, split into lines. `display_path` is the path
/// relative to the root script's directory and is what edge provenance
/// labels show.
#[derive(Debug, Clone)]
pub struct ScriptFile {
    pub path: PathBuf,
    pub display_path: String,
    pub lines: Vec<String>,
    /// Paths referenced by `INCLUDE` directives, resolved against this
    /// file's own directory.
    pub includes: Vec<PathBuf>,
}

impl ScriptFile {
    /// Read and split a script file.
    pub fn load(path: &Path, root_dir: &Path) -> InkGraphResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| InkGraphError::ReadScript {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(path, root_dir, &text))
    }

    /// Build a document directly from lines. Used by tests and library
    /// callers that already hold the text.
    pub fn from_lines<I, S>(display_path: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let display_path = display_path.into();
        Self {
            path: PathBuf::from(&display_path),
            display_path,
            lines: lines.into_iter().map(Into::into).collect(),
            includes: Vec::new(),
        }
    }

    fn from_text(path: &Path, root_dir: &Path, text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let dir = path.parent().unwrap_or(Path::new(""));
        let includes = lines
            .iter()
            .filter_map(|line| INCLUDE.captures(line))
            .map(|captures| dir.join(captures[1].trim()))
            .collect();
        Self {
            path: path.to_path_buf(),
            display_path: display_path_for(path, root_dir),
            lines,
            includes,
        }
    }

    /// Placeholder for an include that could not be read; keeps the file
    /// list and its ordering stable.
    fn placeholder(path: &Path, root_dir: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            display_path: display_path_for(path, root_dir),
            lines: Vec::new(),
            includes: Vec::new(),
        }
    }
}

fn display_path_for(path: &Path, root_dir: &Path) -> String {
    let relative = path.strip_prefix(root_dir).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

/// Case-insensitive identity for include deduplication.
fn dedup_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Breadth-first traversal of the include graph starting at the root
/// script. Returns the files in discovery order, root first, with no
/// duplicates. A missing root is an error; a missing include is only a
/// warning and yields an empty placeholder.
pub fn collect_script_files(root: &Path) -> InkGraphResult<Vec<ScriptFile>> {
    let root_dir = root.parent().unwrap_or(Path::new("")).to_path_buf();

    let mut files = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<PathBuf> = VecDeque::new();

    seen.insert(dedup_key(root));
    queue.push_back(root.to_path_buf());

    let mut is_root = true;
    while let Some(path) = queue.pop_front() {
        let file = match ScriptFile::load(&path, &root_dir) {
            Ok(file) => file,
            Err(err) if is_root => return Err(err),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable include");
                ScriptFile::placeholder(&path, &root_dir)
            }
        };
        is_root = false;

        for include in &file.includes {
            if seen.insert(dedup_key(include)) {
                queue.push_back(include.clone());
            }
        }
        debug!(file = %file.display_path, lines = file.lines.len(), "collected script");
        files.push(file);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn from_lines_keeps_display_path() {
        let file = ScriptFile::from_lines("story.ink", ["== start", "-> END"]);
        assert_eq!(file.display_path, "story.ink");
        assert_eq!(file.lines.len(), 2);
    }

    #[test]
    fn traversal_is_root_first_in_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.ink",
            "INCLUDE chapter1.ink\nINCLUDE chapter2.ink\n== start\n-> DONE\n",
        );
        write(dir.path(), "chapter1.ink", "== one\n-> DONE\n");
        write(
            dir.path(),
            "chapter2.ink",
            "INCLUDE shared/util.ink\n== two\n-> DONE\n",
        );
        write(dir.path(), "shared/util.ink", "== util\n-> DONE\n");

        let files = collect_script_files(&root).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.display_path.as_str()).collect();
        assert_eq!(
            names,
            vec!["main.ink", "chapter1.ink", "chapter2.ink", "shared/util.ink"]
        );
    }

    #[test]
    fn shared_includes_are_collected_once() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.ink",
            "INCLUDE a.ink\nINCLUDE b.ink\n",
        );
        write(dir.path(), "a.ink", "INCLUDE common.ink\n");
        write(dir.path(), "b.ink", "INCLUDE common.ink\n");
        write(dir.path(), "common.ink", "== shared\n");

        let files = collect_script_files(&root).unwrap();
        let shared: Vec<_> = files
            .iter()
            .filter(|f| f.display_path == "common.ink")
            .collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(files.len(), 4);
    }

    #[test]
    fn include_dedup_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(
            dir.path(),
            "main.ink",
            "INCLUDE Extra.ink\nINCLUDE extra.ink\n",
        );
        write(dir.path(), "Extra.ink", "== extra\n");

        let files = collect_script_files(&root).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn missing_include_becomes_empty_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "main.ink", "INCLUDE ghost.ink\n== start\n");

        let files = collect_script_files(&root).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].display_path, "ghost.ink");
        assert!(files[1].lines.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = collect_script_files(&dir.path().join("nope.ink"));
        assert!(result.is_err());
    }

    #[test]
    fn includes_resolve_against_the_including_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "main.ink", "INCLUDE sub/inner.ink\n");
        write(dir.path(), "sub/inner.ink", "INCLUDE deep.ink\n");
        write(dir.path(), "sub/deep.ink", "== deep\n");

        let files = collect_script_files(&root).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.display_path.as_str()).collect();
        assert_eq!(names, vec!["main.ink", "sub/inner.ink", "sub/deep.ink"]);
    }
}
