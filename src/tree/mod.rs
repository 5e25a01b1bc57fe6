// src/tree/mod.rs

//! The in-memory tree of filtered filesystem entries.
//!
//! Nodes live in a single arena (`Vec<FileSystemNode>`) and directories refer
//! to their children by [`NodeId`]. The tree is built by one walk and is not
//! modified afterwards.

use crate::constants::{BINARY_FILE_MARKER, EMPTY_FILE_MARKER, READ_ERROR_MARKER};
use std::path::PathBuf;

mod notebook;
mod reader;
mod walker;

pub use reader::read_body;
pub use walker::build_tree;

/// Index of a node inside its [`FileTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What was read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBody {
    Text(String),
    Empty,
    Binary,
    Unreadable,
}

impl FileBody {
    /// The text, or the placeholder shown in its place.
    pub fn as_str(&self) -> &str {
        match self {
            FileBody::Text(text) => text,
            FileBody::Empty => EMPTY_FILE_MARKER,
            FileBody::Binary => BINARY_FILE_MARKER,
            FileBody::Unreadable => READ_ERROR_MARKER,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FileBody::Text(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File {
        size: u64,
        body: FileBody,
    },
    Directory {
        /// Children in display order.
        children: Vec<NodeId>,
        /// Files and symlinks anywhere below this directory.
        file_count: usize,
    },
    Symlink {
        target: PathBuf,
    },
}

/// One entry of the filtered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemNode {
    /// Display name; empty for an unnamed root.
    pub name: String,
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the ingestion root, `/`-separated.
    pub relative: String,
    /// Depth below the walk start (the root is 0).
    pub depth: usize,
    pub kind: NodeKind,
}

impl FileSystemNode {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Directory { children, .. } => children,
            _ => &[],
        }
    }

    /// Files below a directory, or 1 for a file or symlink.
    pub fn file_count(&self) -> usize {
        match &self.kind {
            NodeKind::Directory { file_count, .. } => *file_count,
            _ => 1,
        }
    }

    /// Name of the link target, for symlinks.
    pub fn link_target_name(&self) -> Option<String> {
        match &self.kind {
            NodeKind::Symlink { target } => Some(
                target
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| target.display().to_string()),
            ),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&FileBody> {
        match &self.kind {
            NodeKind::File { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Arena-backed tree with a single root.
#[derive(Debug, Clone)]
pub struct FileTree {
    nodes: Vec<FileSystemNode>,
    root: NodeId,
}

impl FileTree {
    /// Wraps a lone file or symlink as a tree.
    pub fn single(node: FileSystemNode) -> Self {
        Self {
            nodes: vec![node],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> &FileSystemNode {
        self.node(self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &FileSystemNode {
        &self.nodes[id.0]
    }

    pub fn children<'a>(
        &'a self,
        node: &'a FileSystemNode,
    ) -> impl Iterator<Item = &'a FileSystemNode> + 'a {
        node.children().iter().map(move |id| self.node(*id))
    }

    pub fn is_single_file(&self) -> bool {
        !self.root().is_dir()
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.visit(self.root(), &mut |_| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.root().file_count() == 0
    }

    /// Pre-order visit of every node reachable from `node`.
    pub fn visit<'a>(&'a self, node: &'a FileSystemNode, f: &mut dyn FnMut(&'a FileSystemNode)) {
        f(node);
        for child in self.children(node) {
            self.visit(child, f);
        }
    }
}

/// Incremental construction used by the walker.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<FileSystemNode>,
}

impl TreeBuilder {
    pub(crate) fn push(&mut self, node: FileSystemNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        if let Some(parent) = parent {
            if let NodeKind::Directory { children, .. } = &mut self.nodes[parent.0].kind {
                children.push(id);
            }
        }
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &FileSystemNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut FileSystemNode {
        &mut self.nodes[id.0]
    }

    pub(crate) fn file_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_file())
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Computes file counts, drops directories without files and sorts children.
    pub(crate) fn finish(mut self) -> FileTree {
        // Children always have larger indices than their parent.
        for index in (0..self.nodes.len()).rev() {
            let NodeKind::Directory { children, .. } = &self.nodes[index].kind else {
                continue;
            };
            let mut kept = Vec::with_capacity(children.len());
            let mut total = 0;
            for child in children {
                let count = self.nodes[child.0].file_count();
                if count > 0 {
                    kept.push(*child);
                    total += count;
                }
            }
            kept.sort_by_cached_key(|id| sort_key(&self.nodes[id.0]));
            self.nodes[index].kind = NodeKind::Directory {
                children: kept,
                file_count: total,
            };
        }
        FileTree {
            nodes: self.nodes,
            root: NodeId(0),
        }
    }
}

/// README first, then files, hidden files, directories, hidden directories.
fn sort_key(node: &FileSystemNode) -> (u8, String) {
    let name = node.name.to_lowercase();
    let hidden = name.starts_with('.');
    let group = if node.is_file() {
        if name == "readme" || name.starts_with("readme.") {
            0
        } else if hidden {
            2
        } else {
            1
        }
    } else if hidden {
        4
    } else {
        3
    };
    (group, name)
}
