// src/filtering/patterns.rs

//! Include/exclude glob matching for entries met during a top-down walk.
//!
//! Exclusion is a plain "does the relative path match any pattern" test.
//! Inclusion is asymmetric: a file must match a pattern, but a directory is
//! kept whenever it lies on a path that *could* still lead to a match, so the
//! walker can prune whole subtrees without losing deep files.

use crate::errors::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::fmt;
use std::path::{Component, Path};

const RECURSIVE_SEGMENT: &str = "**";

// `*` stops at `/`, `**` crosses it; dotfiles are not special.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single compiled glob, matched against `/`-separated relative paths.
#[derive(Clone)]
pub struct GlobPattern {
    raw: String,
    compiled: Pattern,
}

impl GlobPattern {
    /// Compiles `raw` as a glob.
    pub fn new(raw: &str) -> Result<Self> {
        let compiled = compile(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            compiled,
        })
    }

    /// The pattern text as given (after normalization).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `relative` matches this pattern exactly.
    pub fn matches(&self, relative: &str) -> bool {
        self.compiled.matches_with(relative, MATCH_OPTIONS)
    }
}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GlobPattern").field(&self.raw).finish()
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// An ordered, de-duplicated set of glob patterns. Empty strings are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternSet {
    patterns: Vec<GlobPattern>,
}

impl PatternSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles every non-empty pattern in `raw`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`] for the first pattern that is not a valid glob.
    pub fn from_patterns<I, S>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pattern in raw {
            set.insert(pattern.as_ref())?;
        }
        Ok(set)
    }

    /// Adds a pattern unless it is blank or already present.
    pub fn insert(&mut self, raw: &str) -> Result<()> {
        let raw = raw.trim();
        if raw.is_empty() || self.patterns.iter().any(|p| p.raw == raw) {
            return Ok(());
        }
        self.patterns.push(GlobPattern::new(raw)?);
        Ok(())
    }

    /// Merges another set into this one, keeping first-seen order.
    pub fn extend(&mut self, other: PatternSet) {
        for pattern in other.patterns {
            if !self.patterns.contains(&pattern) {
                self.patterns.push(pattern);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlobPattern> {
        self.patterns.iter()
    }

    /// True if `relative` matches any pattern exactly.
    pub fn matches_any(&self, relative: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(relative))
    }
}

/// Renders `path` relative to `base` with `/` separators.
///
/// Returns `None` when `path` is not located under `base`.
pub fn relative_path_string(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

/// Decides whether `path` survives the include patterns.
///
/// The entry kind is read from the filesystem. Paths outside `base` are never
/// included.
///
/// # Errors
/// Returns [`Error::TraversalInvariant`] when `path` is a directory deeper than
/// every non-recursive pattern allows and no pattern matched it.
pub fn should_include(path: &Path, base: &Path, include: &PatternSet) -> Result<bool> {
    match relative_path_string(path, base) {
        Some(relative) => should_include_relative(&relative, path.is_dir(), include),
        None => Ok(false),
    }
}

/// Decides whether `path` is removed by the exclude patterns.
///
/// Paths outside `base` are always excluded.
pub fn should_exclude(path: &Path, base: &Path, exclude: &PatternSet) -> bool {
    match relative_path_string(path, base) {
        Some(relative) => should_exclude_relative(&relative, exclude),
        None => true,
    }
}

/// Exclude test on an already-relative path. The base itself is never excluded.
pub fn should_exclude_relative(relative: &str, exclude: &PatternSet) -> bool {
    !relative.is_empty() && exclude.matches_any(relative)
}

/// Include test on an already-relative path, with the entry kind supplied by the caller.
///
/// An empty include set includes everything. The base itself is always included.
pub fn should_include_relative(relative: &str, is_dir: bool, include: &PatternSet) -> Result<bool> {
    if include.is_empty() || relative.is_empty() {
        return Ok(true);
    }
    if !is_dir {
        return Ok(include.matches_any(relative));
    }

    let mut violation = None;
    for pattern in include.iter() {
        match directory_could_match(relative, pattern.as_str()) {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(err @ Error::TraversalInvariant { .. }) => {
                violation.get_or_insert(err);
            }
            Err(other) => return Err(other),
        }
    }
    match violation {
        Some(err) => Err(err),
        None => Ok(false),
    }
}

/// Whether directory `relative` may contain something matching `pattern`.
fn directory_could_match(relative: &str, pattern: &str) -> Result<bool> {
    let widened;
    let pattern = if pattern.ends_with("/*") {
        widened = format!("{pattern}*");
        widened.as_str()
    } else {
        pattern
    };

    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let dir_parts: Vec<&str> = relative.split('/').collect();
    let recursive_at = pattern_parts.iter().position(|p| *p == RECURSIVE_SEGMENT);

    let prefix = match recursive_at {
        None => {
            if dir_parts.len() > pattern_parts.len() {
                // A basename pattern says nothing about directory depth.
                if pattern_parts.len() == 1 {
                    return Ok(false);
                }
                return Err(Error::TraversalInvariant {
                    dir: relative.to_string(),
                    dir_segments: dir_parts.len(),
                    pattern: pattern.to_string(),
                    pattern_segments: pattern_parts.len(),
                });
            }
            return Ok(compile(&pattern_parts[..dir_parts.len()].join("/"))?
                .matches_with(relative, MATCH_OPTIONS));
        }
        Some(index) => pattern_parts[..dir_parts.len().min(index)].join("/"),
    };

    // The prefix stands for "anything below here": match it with an open tail.
    let open = if prefix.ends_with('*') {
        prefix
    } else {
        format!("{prefix}*")
    };
    let deep = format!("{open}/{RECURSIVE_SEGMENT}");
    Ok(compile(&open)?.matches_with(relative, MATCH_OPTIONS)
        || compile(&deep)?.matches_with(relative, MATCH_OPTIONS))
}

fn compile(raw: &str) -> Result<Pattern> {
    Pattern::new(raw).map_err(|e| Error::InvalidPattern {
        pattern: raw.to_string(),
        reason: e.msg.to_string(),
    })
}
