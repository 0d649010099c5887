//! Loading and saving ticket trees as JSON files.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::cli::error::{CliError, CliResult};
use crate::ticket::Ticket;
use crate::tree::Tree;

/// Reads a tree file and validates the rebuilt tree.
#[instrument(level = "debug")]
pub fn load_tree(path: &Path) -> CliResult<Tree<Ticket>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("read {}", path.display()), e))?;
    let tree: Tree<Ticket> = serde_json::from_str(&content).map_err(|source| CliError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    tree.validate()?;
    debug!("loaded {} nodes", tree.size());
    Ok(tree)
}

/// Writes `tree` to `path` atomically: the content goes to a temporary file
/// in the same directory which then replaces the target.
#[instrument(level = "debug", skip(tree))]
pub fn save_tree(path: &Path, tree: &Tree<Ticket>, pretty: bool) -> CliResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(tree)
    } else {
        serde_json::to_string(tree)
    }
    .map_err(|source| CliError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)
        .map_err(|e| CliError::io(format!("create temp file in {}", dir.display()), e))?;
    writeln!(file, "{json}").map_err(|e| CliError::io("write tree", e))?;
    file.persist(path)
        .map_err(|e| CliError::io(format!("write {}", path.display()), e.error))?;
    debug!("saved {} nodes", tree.size());
    Ok(())
}

/// Resolves a dotted child-index path (`""` = root, `"0.2"`) below `root`.
pub fn resolve_path(root: &Tree<Ticket>, path: &str) -> CliResult<Tree<Ticket>> {
    let path = path.trim();
    if path.is_empty() || path == "." {
        return Ok(root.clone());
    }

    let mut current = root.clone();
    for segment in path.split('.') {
        let index: usize = segment
            .parse()
            .map_err(|_| CliError::InvalidArgs(format!("invalid path segment '{segment}' in '{path}'")))?;
        current = current
            .child(index)
            .ok_or_else(|| CliError::InvalidArgs(format!("no node at '{path}'")))?;
    }
    Ok(current)
}
