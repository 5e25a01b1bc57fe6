// src/filtering/mod.rs

//! Provides standalone functions for file filtering logic.
//!
//! These functions are used by the tree walk to decide which entries survive
//! the include/exclude patterns and which files are readable text. They are
//! exposed publicly for use outside the ingestion pipeline.

mod ignore_file;
mod patterns;
mod text_detection;

pub use ignore_file::{
    default_ignore_patterns, expand_ignore_line, load_ignore_patterns, DEFAULT_IGNORE_PATTERNS,
};
pub use patterns::{
    relative_path_string, should_exclude, should_exclude_relative, should_include,
    should_include_relative, GlobPattern, PatternSet,
};
pub use text_detection::is_likely_text_from_buffer;
