// src/processing/kinds.rs

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A category of comment that can be requested for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    /// Line comments such as `// ...` or `# ...`.
    #[value(name = "single_line")]
    SingleLine,
    /// Block comments such as `/* ... */`.
    #[value(name = "multi_line")]
    MultiLine,
    /// Doc comments (`///`, `/** */`) and docstrings.
    #[value(name = "documentation")]
    Documentation,
    /// Every kind above.
    #[value(name = "all")]
    All,
}

impl CommentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentKind::SingleLine => "single_line",
            CommentKind::MultiLine => "multi_line",
            CommentKind::Documentation => "documentation",
            CommentKind::All => "all",
        }
    }
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "single_line" | "single" => Ok(CommentKind::SingleLine),
            "multi_line" | "multi" => Ok(CommentKind::MultiLine),
            "documentation" | "doc" | "docs" => Ok(CommentKind::Documentation),
            "all" => Ok(CommentKind::All),
            other => Err(format!(
                "unknown comment kind '{other}' (expected single_line, multi_line, documentation or all)"
            )),
        }
    }
}

/// The set of comment kinds to remove, with `All` already expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommentKinds {
    single_line: bool,
    multi_line: bool,
    documentation: bool,
}

impl CommentKinds {
    /// Every kind of comment.
    pub const ALL: CommentKinds = CommentKinds {
        single_line: true,
        multi_line: true,
        documentation: true,
    };

    /// No comment kinds.
    pub const NONE: CommentKinds = CommentKinds {
        single_line: false,
        multi_line: false,
        documentation: false,
    };

    /// A set holding exactly `kind` (or everything, for `All`).
    pub fn only(kind: CommentKind) -> Self {
        let mut kinds = Self::NONE;
        kinds.insert(kind);
        kinds
    }

    pub fn insert(&mut self, kind: CommentKind) {
        match kind {
            CommentKind::SingleLine => self.single_line = true,
            CommentKind::MultiLine => self.multi_line = true,
            CommentKind::Documentation => self.documentation = true,
            CommentKind::All => *self = Self::ALL,
        }
    }

    /// Whether `kind` is requested. `All` is only contained in the full set.
    pub fn contains(&self, kind: CommentKind) -> bool {
        match kind {
            CommentKind::SingleLine => self.single_line,
            CommentKind::MultiLine => self.multi_line,
            CommentKind::Documentation => self.documentation,
            CommentKind::All => *self == Self::ALL,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for CommentKinds {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<CommentKind> for CommentKinds {
    fn from_iter<I: IntoIterator<Item = CommentKind>>(iter: I) -> Self {
        let mut kinds = Self::NONE;
        for kind in iter {
            kinds.insert(kind);
        }
        kinds
    }
}
