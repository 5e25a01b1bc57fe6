// src/output/content.rs

use crate::config::IngestionQuery;
use crate::constants::SEPARATOR;
use crate::processing::{should_strip, strip_comments, StripOutcome};
use crate::tree::{FileSystemNode, FileTree, NodeKind};
use log::debug;

/// Concatenates every file below the root, depth-first.
pub fn gather_contents(tree: &FileTree, query: &IngestionQuery) -> String {
    gather(tree, tree.root(), query)
}

fn gather(tree: &FileTree, node: &FileSystemNode, query: &IngestionQuery) -> String {
    match &node.kind {
        NodeKind::Directory { .. } => tree
            .children(node)
            .map(|child| gather(tree, child, query))
            .collect::<Vec<_>>()
            .join("\n"),
        NodeKind::File { .. } | NodeKind::Symlink { .. } => file_block(node, query),
    }
}

/// One file wrapped in its separator header, followed by a blank line.
pub fn file_block(node: &FileSystemNode, query: &IngestionQuery) -> String {
    let (label, body) = match &node.kind {
        NodeKind::Symlink { .. } => (
            format!(
                "SYMLINK: {} -> {}",
                node.relative,
                node.link_target_name().unwrap_or_default()
            ),
            String::new(),
        ),
        NodeKind::File { body, .. } => (
            format!("FILE: {}", node.relative),
            file_body(node, body.as_str(), body.is_text(), query),
        ),
        NodeKind::Directory { .. } => return String::new(),
    };
    format!("{SEPARATOR}\n{label}\n{SEPARATOR}\n{body}\n\n")
}

fn file_body(node: &FileSystemNode, text: &str, is_text: bool, query: &IngestionQuery) -> String {
    if !(query.remove_comments && is_text && should_strip(&node.path)) {
        return text.to_string();
    }
    let outcome = strip_comments(text, &node.path, query.comment_kinds);
    if let StripOutcome::Failed(e) = &outcome {
        debug!("Keeping comments in {}: {}", node.relative, e);
    }
    outcome.unwrap_or_original(text)
}
