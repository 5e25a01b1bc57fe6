// src/output/summary.rs

use crate::config::IngestionQuery;
use crate::tree::{FileTree, NodeKind};
use std::fmt::Write;

/// Builds the summary header (without the token estimate).
///
/// Directory roots report `Files analyzed: N`; a single file reports its
/// name and line count instead, and never a subpath.
pub fn summary(tree: &FileTree, query: &IngestionQuery) -> String {
    let root = tree.root();
    let single_file = root.is_file();
    let mut out = summary_prefix(query, single_file);

    match &root.kind {
        NodeKind::Directory { file_count, .. } => {
            let _ = writeln!(out, "Files analyzed: {}", file_count);
        }
        NodeKind::File { body, .. } => {
            let _ = writeln!(out, "File: {}", root.name);
            let _ = writeln!(out, "Lines: {}", group_thousands(body.as_str().lines().count()));
        }
        NodeKind::Symlink { .. } => {}
    }
    out
}

fn summary_prefix(query: &IngestionQuery, single_file: bool) -> String {
    let mut parts = Vec::new();
    match (&query.user_name, &query.repo_name) {
        (Some(user), Some(repo)) => parts.push(format!("Repository: {user}/{repo}")),
        _ => parts.push(format!("Directory: {}", query.slug)),
    }
    if let Some(commit) = &query.commit {
        parts.push(format!("Commit: {commit}"));
    } else if let Some(branch) = query.display_branch() {
        parts.push(format!("Branch: {branch}"));
    }
    if query.subpath != "/" && !single_file {
        parts.push(format!("Subpath: {}", query.subpath));
    }
    parts.join("\n") + "\n"
}

/// `1234567` becomes `1,234,567`.
pub(crate) fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryBuilder;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234), "1,234");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_remote_prefix() -> anyhow::Result<()> {
        let query = QueryBuilder::new("https://github.com/o/r/tree/dev/src").build()?;
        assert_eq!(
            summary_prefix(&query, false),
            "Repository: o/r\nBranch: dev\nSubpath: /src\n"
        );
        assert_eq!(summary_prefix(&query, true), "Repository: o/r\nBranch: dev\n");

        let main = QueryBuilder::new("https://github.com/o/r/tree/main").build()?;
        assert_eq!(summary_prefix(&main, false), "Repository: o/r\n");

        let commit = "0123456789abcdef0123456789abcdef01234567";
        let pinned = QueryBuilder::new("https://github.com/o/r/tree/dev")
            .commit(commit)
            .build()?;
        assert_eq!(
            summary_prefix(&pinned, false),
            format!("Repository: o/r\nCommit: {commit}\n")
        );
        Ok(())
    }
}
