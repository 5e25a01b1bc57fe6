// src/output/tree.rs

use crate::config::IngestionQuery;
use crate::constants::TREE_HEADER;
use crate::tree::{FileSystemNode, FileTree, NodeKind};

/// Renders the tree section, starting with `Directory structure:`.
///
/// ```text
/// Directory structure:
/// └── repo/
///     ├── README.md
///     └── src/
///         └── lib.rs
/// ```
pub fn render_tree(tree: &FileTree, query: &IngestionQuery) -> String {
    let mut out = String::from(TREE_HEADER);
    render_node(tree, tree.root(), query, "", true, &mut out);
    out
}

fn render_node(
    tree: &FileTree,
    node: &FileSystemNode,
    query: &IngestionQuery,
    prefix: &str,
    is_last: bool,
    out: &mut String,
) {
    let name = if node.name.is_empty() {
        query.slug.as_str()
    } else {
        node.name.as_str()
    };

    out.push_str(prefix);
    out.push_str(if is_last { "└── " } else { "├── " });
    out.push_str(name);
    match &node.kind {
        NodeKind::Directory { .. } => out.push('/'),
        NodeKind::Symlink { .. } => {
            out.push_str(" -> ");
            out.push_str(&node.link_target_name().unwrap_or_default());
        }
        NodeKind::File { .. } => {}
    }
    out.push('\n');

    let children = node.children();
    if children.is_empty() {
        return;
    }
    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    for (i, child) in tree.children(node).enumerate() {
        render_node(tree, child, query, &child_prefix, i + 1 == children.len(), out);
    }
}
