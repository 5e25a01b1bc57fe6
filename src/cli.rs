// src/cli.rs

use crate::processing::CommentKind;
use clap::Parser;

/// Turn a repository or directory into a prompt-friendly text digest.
///
/// repodigest clones a remote repository (or reads a local path), filters its
/// files with glob patterns and `.gitignore` rules, and writes a summary, an
/// ASCII directory tree and the concatenated file contents, optionally with
/// comments stripped.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Local directory or file, or a repository URL (e.g. github.com/owner/repo/tree/main/src).
    #[arg(default_value = ".")]
    pub source: String,

    /// Output file, or '-' for standard output [default: digest.txt].
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<String>,

    /// Maximum file size to include (e.g. "10MiB", "512k"). Larger files are skipped.
    #[arg(short = 's', long = "max-size", value_name = "BYTES")]
    pub max_size: Option<String>,

    /// Only include files matching these glob patterns (comma separated, repeatable).
    #[arg(short = 'i', long = "include", value_name = "GLOB", num_args = 1..)]
    pub include: Vec<String>,

    /// Exclude files and directories matching these glob patterns (comma separated, repeatable).
    #[arg(short = 'e', long = "exclude", value_name = "GLOB", num_args = 1..)]
    pub exclude: Vec<String>,

    // --- Remote Options ---
    /// Branch to clone.
    #[arg(short = 'b', long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Tag to clone. Takes precedence over --branch.
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Full 40-character commit hash to check out.
    #[arg(long, value_name = "SHA")]
    pub commit: Option<String>,

    /// Access token for private repositories.
    #[arg(short = 't', long, env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Clone submodules as well.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub include_submodules: bool,

    /// Seconds allowed for each git command.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    // --- Content Options ---
    /// Do not apply .gitignore and .repodigestignore rules.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub include_gitignored: bool,

    /// Strip comments from supported source files.
    #[arg(short = 'c', long, action = clap::ArgAction::SetTrue)]
    pub remove_comments: bool,

    /// Comment kinds to strip with --remove-comments [default: all].
    #[arg(long = "comment-types", value_enum, value_name = "KIND", num_args = 1.., value_delimiter = ',')]
    pub comment_types: Vec<CommentKind>,

    /// Print the digest as JSON on standard output instead of writing it.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["repodigest"]);
        assert_eq!(cli.source, ".");
        assert!(cli.include.is_empty());
        assert!(cli.comment_types.is_empty());
        assert!(!cli.remove_comments);
    }

    #[test]
    fn test_comment_types_accept_lists() {
        let cli = Cli::parse_from([
            "repodigest",
            ".",
            "--comment-types",
            "single_line,documentation",
        ]);
        assert_eq!(
            cli.comment_types,
            vec![CommentKind::SingleLine, CommentKind::Documentation]
        );
        assert!(Cli::try_parse_from(["repodigest", ".", "--comment-types", "bogus"]).is_err());
    }
}
