// src/tree/walker.rs

use super::{read_body, FileBody, FileSystemNode, FileTree, NodeId, NodeKind, TreeBuilder};
use crate::cancellation::CancellationToken;
use crate::config::IngestionQuery;
use crate::constants::{MAX_DIRECTORY_DEPTH, MAX_FILES, MAX_TOTAL_SIZE_BYTES};
use crate::errors::{io_error_with_path, Error, Result};
use crate::filtering::{relative_path_string, should_exclude_relative, should_include_relative};
use log::{debug, trace, warn};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Walks the query's target and builds the filtered tree.
///
/// The walk starts at the subpath and patterns are evaluated relative to it;
/// node labels stay relative to `query.local_path`. Excluded or non-included directories are pruned
/// without descending. File contents are read in parallel once the shape of
/// the tree is known.
///
/// # Errors
/// Fails if the target does not exist, if the walk is cancelled, or if a
/// pattern-matching invariant is violated.
pub fn build_tree(query: &IngestionQuery, token: &CancellationToken) -> Result<FileTree> {
    let start = query.walk_root();
    let metadata = fs::symlink_metadata(&start).map_err(|e| io_error_with_path(e, &start))?;

    if !metadata.is_dir() {
        debug!("Ingesting single entry {}", start.display());
        return Ok(FileTree::single(single_node(&start, &query.local_path, &metadata)));
    }

    let mut builder = TreeBuilder::default();
    let root = builder.push(
        FileSystemNode {
            name: file_name(&start),
            path: start.clone(),
            relative: relative_path_string(&start, &query.local_path).unwrap_or_default(),
            depth: 0,
            kind: NodeKind::Directory {
                children: Vec::new(),
                file_count: 0,
            },
        },
        None,
    );

    let mut parents: Vec<(usize, NodeId)> = vec![(0, root)];
    let mut total_files = 0usize;
    let mut total_size = 0u64;

    let mut entries = WalkDir::new(&start)
        .follow_links(false)
        .max_depth(MAX_DIRECTORY_DEPTH)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = entries.next() {
        if token.is_cancelled() {
            return Err(Error::Interrupted);
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let file_type = entry.file_type();
        let (Some(relative), Some(matched)) = (
            relative_path_string(entry.path(), &query.local_path),
            relative_path_string(entry.path(), &start),
        ) else {
            continue;
        };

        // Repository ignore files are anchored at `local_path`, so excludes
        // are also tried against the repository-relative path.
        let excluded = should_exclude_relative(&matched, &query.exclude_patterns)
            || (matched != relative && should_exclude_relative(&relative, &query.exclude_patterns));
        if excluded
            || !should_include_relative(&matched, file_type.is_dir(), &query.include_patterns)?
        {
            trace!("Filtered out {}", relative);
            if file_type.is_dir() {
                entries.skip_current_dir();
            }
            continue;
        }

        while parents.last().is_some_and(|(depth, _)| *depth >= entry.depth()) {
            parents.pop();
        }
        let parent = parents.last().map(|(_, id)| *id);

        let kind = if file_type.is_symlink() {
            let target = fs::read_link(entry.path()).map_err(|e| io_error_with_path(e, entry.path()))?;
            NodeKind::Symlink { target }
        } else if file_type.is_dir() {
            NodeKind::Directory {
                children: Vec::new(),
                file_count: 0,
            }
        } else {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size > query.max_file_size {
                debug!("Skipping {} ({} bytes over limit)", relative, size);
                continue;
            }
            if total_size + size > MAX_TOTAL_SIZE_BYTES {
                warn!(
                    "Total size limit of {} bytes reached; stopping at {}",
                    MAX_TOTAL_SIZE_BYTES, relative
                );
                break;
            }
            total_size += size;
            NodeKind::File {
                size,
                body: FileBody::Empty,
            }
        };

        if !matches!(kind, NodeKind::Directory { .. }) {
            if total_files >= MAX_FILES {
                warn!("File limit of {} reached; remaining entries are skipped", MAX_FILES);
                break;
            }
            total_files += 1;
        }

        let is_dir = matches!(kind, NodeKind::Directory { .. });
        let id = builder.push(
            FileSystemNode {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path().to_path_buf(),
                relative,
                depth: entry.depth(),
                kind,
            },
            parent,
        );
        if is_dir {
            parents.push((entry.depth(), id));
        }
    }

    read_contents(&mut builder);
    let tree = builder.finish();
    debug!(
        "Collected {} files under {}",
        tree.root().file_count(),
        start.display()
    );
    Ok(tree)
}

/// Fills in every file body, reading files in parallel.
fn read_contents(builder: &mut TreeBuilder) {
    let files: Vec<(NodeId, std::path::PathBuf)> = builder
        .file_ids()
        .into_iter()
        .map(|id| (id, builder.node(id).path.clone()))
        .collect();

    let bodies: Vec<(NodeId, FileBody)> = files
        .into_par_iter()
        .map(|(id, path)| (id, read_body(&path)))
        .collect();

    for (id, body) in bodies {
        if let NodeKind::File { body: slot, .. } = &mut builder.node_mut(id).kind {
            *slot = body;
        }
    }
}

fn single_node(path: &Path, base: &Path, metadata: &fs::Metadata) -> FileSystemNode {
    let kind = if metadata.file_type().is_symlink() {
        NodeKind::Symlink {
            target: fs::read_link(path).unwrap_or_default(),
        }
    } else {
        NodeKind::File {
            size: metadata.len(),
            body: read_body(path),
        }
    };
    FileSystemNode {
        name: file_name(path),
        path: path.to_path_buf(),
        relative: relative_path_string(path, base)
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| file_name(path)),
        depth: 0,
        kind,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
