// src/output/mod.rs

//! Renders a [`FileTree`] into the three parts of a digest: summary, tree
//! and concatenated file contents.

use crate::config::IngestionQuery;
use crate::tree::FileTree;
use log::debug;
use serde::Serialize;

mod content;
mod summary;
mod tokens;
mod tree;
mod writer;

pub use content::{file_block, gather_contents};
pub use summary::summary;
pub use tokens::{estimate_tokens, format_token_count};
pub use tree::render_tree;
pub use writer::write_digest;

/// The rendered result of one ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub summary: String,
    pub tree: String,
    pub content: String,
}

impl Digest {
    /// The text written to the output destination: tree, newline, content.
    pub fn text(&self) -> String {
        format!("{}\n{}", self.tree, self.content)
    }
}

/// Produces the summary, tree and content for `tree`.
///
/// The summary ends with an `Estimated tokens:` line computed over the tree
/// and content; it is left out when no estimate is available.
pub fn format(tree: &FileTree, query: &IngestionQuery) -> Digest {
    let mut summary = summary(tree, query);
    let rendered_tree = render_tree(tree, query);
    let content = gather_contents(tree, query);

    let combined = format!("{rendered_tree}{content}");
    if let Some(tokens) = estimate_tokens(&combined) {
        summary.push_str(&format!("\nEstimated tokens: {}", format_token_count(tokens)));
    }
    debug!(
        "Formatted digest: {} bytes of tree, {} bytes of content",
        rendered_tree.len(),
        content.len()
    );

    Digest {
        summary,
        tree: rendered_tree,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::CancellationToken;
    use crate::config::QueryBuilder;
    use crate::tree::build_tree;
    use std::fs;
    use tempfile::tempdir;

    const SEP: &str = "================================================";

    #[test]
    fn test_format_directory() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let root = temp.path().join("proj");
        fs::create_dir_all(root.join("src"))?;
        fs::write(root.join("README.md"), "# Title\n")?;
        fs::write(root.join("src/lib.rs"), "pub fn f() {}\n")?;
        fs::write(root.join("empty.txt"), "")?;

        let query = QueryBuilder::new(root.to_string_lossy()).build()?;
        let tree = build_tree(&query, &CancellationToken::new())?;
        let digest = format(&tree, &query);

        assert!(digest.summary.starts_with("Directory: proj\nFiles analyzed: 3\n"));
        assert_eq!(
            digest.tree,
            "Directory structure:\n└── proj/\n    ├── README.md\n    ├── empty.txt\n    └── src/\n        └── lib.rs\n"
        );
        let expected = format!(
            "{SEP}\nFILE: README.md\n{SEP}\n# Title\n\n\n\n\
             {SEP}\nFILE: empty.txt\n{SEP}\n[Empty file]\n\n\n\
             {SEP}\nFILE: src/lib.rs\n{SEP}\npub fn f() {{}}\n\n\n"
        );
        assert_eq!(digest.content, expected);
        assert_eq!(digest.text(), format!("{}\n{}", digest.tree, digest.content));
        Ok(())
    }

    #[test]
    fn test_format_single_file_with_comment_removal() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let file = temp.path().join("main.py");
        fs::write(&file, "# header\nx = 1  # one\n")?;

        let query = QueryBuilder::new(file.to_string_lossy())
            .remove_comments(true)
            .build()?;
        let tree = build_tree(&query, &CancellationToken::new())?;
        let digest = format(&tree, &query);

        assert!(digest.summary.contains("File: main.py\nLines: 2\n"));
        assert!(!digest.summary.contains("Subpath"));
        assert_eq!(digest.tree, "Directory structure:\n└── main.py\n");
        assert_eq!(
            digest.content,
            format!("{SEP}\nFILE: main.py\n{SEP}\n\nx = 1  \n\n\n")
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_block_and_tree_entry() -> anyhow::Result<()> {
        use std::os::unix::fs::symlink;
        let temp = tempdir()?;
        let root = temp.path().join("links");
        fs::create_dir_all(&root)?;
        fs::write(root.join("target.txt"), "data")?;
        symlink(root.join("target.txt"), root.join("alias.txt"))?;

        let query = QueryBuilder::new(root.to_string_lossy()).build()?;
        let tree = build_tree(&query, &CancellationToken::new())?;
        let digest = format(&tree, &query);

        // Symlinks sort with directories, after regular files.
        assert!(digest.tree.ends_with("    ├── target.txt\n    └── alias.txt -> target.txt\n"));
        assert!(digest
            .content
            .contains(&format!("{SEP}\nSYMLINK: alias.txt -> target.txt\n{SEP}\n\n\n")));
        Ok(())
    }
}
