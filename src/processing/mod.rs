// src/processing/mod.rs

//! Comment stripping for file bodies.
//!
//! Content is tokenized with a per-language [`Grammar`] and every comment
//! token of a requested [`CommentKind`] is replaced by the newlines it
//! contained, so line numbers in the digest still line up with the source.
//! Stripping is best-effort: [`strip_comments`] reports unsupported or
//! unlexable input through [`StripOutcome`] instead of failing.

use log::{debug, trace};
use std::path::Path;

mod grammar;
mod kinds;
mod lexer;

pub use grammar::Grammar;
pub use kinds::{CommentKind, CommentKinds};
pub use lexer::{CommentClass, LexError, Lexer, Token, TokenKind};

/// Extensions that are never treated as source text.
const BINARY_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "bin", "img", "jpg", "jpeg", "png", "gif", "bmp", "ico", "svg",
    "pdf", "zip", "tar", "gz", "rar", "7z",
];

/// Result of a stripping attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripOutcome {
    /// The content after removal. Identical to the input when nothing matched.
    Stripped(String),
    /// No grammar is known for the path.
    Unsupported,
    /// The grammar could not tokenize the content.
    Failed(LexError),
}

impl StripOutcome {
    /// The stripped text, or `original` when stripping did not happen.
    pub fn unwrap_or_original(self, original: &str) -> String {
        match self {
            StripOutcome::Stripped(text) => text,
            StripOutcome::Unsupported | StripOutcome::Failed(_) => original.to_string(),
        }
    }
}

/// Whether comment stripping applies to `path` at all.
///
/// # Examples
/// ```
/// use repodigest::processing::should_strip;
/// use std::path::Path;
///
/// assert!(should_strip(Path::new("src/main.rs")));
/// assert!(!should_strip(Path::new("logo.svg")));
/// assert!(!should_strip(Path::new("notes.txt")));
/// ```
pub fn should_strip(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if BINARY_EXTENSIONS.contains(&extension.as_str()) {
        return false;
    }
    Grammar::for_path(path).is_some()
}

/// Removes the comments of the requested `kinds` from `content`.
///
/// Every removed comment is replaced by the newlines it spanned. If the last
/// line of the input was a comment without a trailing newline, one newline is
/// appended so the line count is unchanged.
pub fn strip_comments(content: &str, path: &Path, kinds: CommentKinds) -> StripOutcome {
    if content.trim().is_empty() || kinds.is_empty() {
        return StripOutcome::Stripped(content.to_string());
    }
    let Some(grammar) = Grammar::for_path(path) else {
        return StripOutcome::Unsupported;
    };
    trace!("Stripping comments from {} as {}", path.display(), grammar.name());

    let mut output = String::with_capacity(content.len());
    let mut removed = 0usize;
    for token in grammar.tokens(content) {
        let token = match token {
            Ok(token) => token,
            Err(err) => {
                debug!("Could not tokenize {}: {}", path.display(), err);
                return StripOutcome::Failed(err);
            }
        };
        match removal_kind(&token) {
            Some(kind) if kinds.contains(kind) => {
                removed += 1;
                output.extend(std::iter::repeat('\n').take(token.text.matches('\n').count()));
            }
            _ => output.push_str(token.text),
        }
    }

    if removed == 0 {
        return StripOutcome::Stripped(content.to_string());
    }
    if output.lines().count() < content.lines().count() {
        output.push('\n');
    }
    debug!("Removed {removed} comments from {}", path.display());
    StripOutcome::Stripped(output)
}

/// The comment kind a token counts as, or `None` if it is not removable.
fn removal_kind(token: &Token<'_>) -> Option<CommentKind> {
    match token.kind {
        TokenKind::Comment(CommentClass::Single) => Some(CommentKind::SingleLine),
        TokenKind::Comment(CommentClass::Multi) => Some(CommentKind::MultiLine),
        TokenKind::Comment(CommentClass::Doc) | TokenKind::DocString => {
            Some(CommentKind::Documentation)
        }
        TokenKind::Comment(CommentClass::Generic) => Some(classify_generic(token.text)),
        TokenKind::Code | TokenKind::String => None,
    }
}

/// Infers the kind of a comment whose grammar does not say.
fn classify_generic(text: &str) -> CommentKind {
    const DOC_MARKERS: [&str; 5] = ["\"\"\"", "'''", "/**", "///", "##"];
    if DOC_MARKERS.iter().any(|m| text.contains(m)) {
        CommentKind::Documentation
    } else if text.contains('\n') || text.contains("/*") || text.contains("*/") {
        CommentKind::MultiLine
    } else {
        CommentKind::SingleLine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(content: &str, file: &str, kinds: CommentKinds) -> String {
        match strip_comments(content, Path::new(file), kinds) {
            StripOutcome::Stripped(text) => text,
            other => panic!("expected Stripped, got {other:?}"),
        }
    }

    #[test]
    fn test_removes_rust_comments_and_keeps_lines() {
        let src = "/// Adds.\nfn add(a: i32) -> i32 {\n    a + 1 // bump\n}\n/* tail\nblock */\n";
        let out = strip(src, "lib.rs", CommentKinds::ALL);
        assert_eq!(out, "\nfn add(a: i32) -> i32 {\n    a + 1 \n}\n\n\n");
        assert_eq!(out.lines().count(), src.lines().count());
    }

    #[test]
    fn test_kind_filter_is_respected() {
        let src = "/// doc\n// plain\n/* block */\nfn f() {}\n";
        let only_doc = strip(src, "a.rs", CommentKinds::only(CommentKind::Documentation));
        assert_eq!(only_doc, "\n// plain\n/* block */\nfn f() {}\n");

        let only_single = strip(src, "a.rs", CommentKinds::only(CommentKind::SingleLine));
        assert_eq!(only_single, "/// doc\n\n/* block */\nfn f() {}\n");

        let only_multi = strip(src, "a.rs", CommentKinds::only(CommentKind::MultiLine));
        assert_eq!(only_multi, "/// doc\n// plain\n\nfn f() {}\n");
    }

    #[test]
    fn test_python_docstring_removed_as_documentation() {
        let src = "def f():\n    \"\"\"Say hi.\n\n    Long.\n    \"\"\"\n    return 1  # one\n";
        let out = strip(src, "m.py", CommentKinds::only(CommentKind::Documentation));
        assert_eq!(out, "def f():\n    \n\n\n\n    return 1  # one\n");
    }

    #[test]
    fn test_comment_free_content_round_trips() {
        let src = "let url = \"http://x/*y*/\";\nlet c = '/';\n";
        assert_eq!(strip(src, "a.rs", CommentKinds::ALL), src);
    }

    #[test]
    fn test_stripping_documentation_is_idempotent() {
        let src = "class A:\n    '''Doc'''\n    ## note\n    x = 1\n";
        let once = strip(src, "a.py", CommentKinds::only(CommentKind::Documentation));
        let twice = strip(&once, "a.py", CommentKinds::only(CommentKind::Documentation));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_trailing_comment_without_newline_keeps_line_count() {
        let src = "x = 1\n# last";
        let out = strip(src, "a.py", CommentKinds::ALL);
        assert_eq!(out, "x = 1\n\n");
        assert_eq!(out.lines().count(), src.lines().count());
    }

    #[test]
    fn test_line_count_invariant_across_grammars() {
        let cases = [
            ("a.c", "int x; /* a\n b */ // c\nint y;"),
            ("a.js", "const s = `multi\n// not a comment`; // real"),
            ("a.sql", "SELECT 1; -- one\n/* two\nlines */"),
            ("a.html", "<p>x</p>\n<!-- note\nmore -->\n<p>y</p>"),
            ("a.hs", "{- outer {- inner -} -}\nmain = pure () -- done"),
            ("a.lua", "--[[ block\n]] print(1) -- tail"),
            ("a.yaml", "key: value # trailing\n# whole line"),
        ];
        for (file, src) in cases {
            let out = strip(src, file, CommentKinds::ALL);
            assert_eq!(out.lines().count(), src.lines().count(), "{file}: {out:?}");
        }
    }

    #[test]
    fn test_generic_comments_use_surface_form() {
        assert_eq!(classify_generic("## Section"), CommentKind::Documentation);
        assert_eq!(classify_generic("<!-- a\nb -->"), CommentKind::MultiLine);
        assert_eq!(classify_generic("# note"), CommentKind::SingleLine);

        let src = "## Usage\n# plain\n";
        let out = strip(src, "Makefile", CommentKinds::only(CommentKind::SingleLine));
        assert_eq!(out, "## Usage\n\n");
    }

    #[test]
    fn test_unsupported_and_failed_outcomes() {
        assert_eq!(
            strip_comments("hello # world", Path::new("notes.txt"), CommentKinds::ALL),
            StripOutcome::Unsupported
        );
        let broken = "int main() { /* never closed";
        let outcome = strip_comments(broken, Path::new("a.c"), CommentKinds::ALL);
        assert!(matches!(outcome, StripOutcome::Failed(_)));
        assert_eq!(outcome.unwrap_or_original(broken), broken);
    }

    #[test]
    fn test_blank_content_is_returned_unchanged() {
        assert_eq!(strip("  \n\n", "a.rs", CommentKinds::ALL), "  \n\n");
    }

    #[test]
    fn test_should_strip() {
        assert!(should_strip(Path::new("Dockerfile")));
        assert!(should_strip(Path::new("config.yml")));
        assert!(!should_strip(Path::new("archive.tar.gz")));
        assert!(!should_strip(Path::new("photo.JPG")));
        assert!(!should_strip(Path::new("README")));
    }
}
