// src/config/parsing.rs

use crate::errors::ConfigError;
use byte_unit::Byte;
use std::str::FromStr;

/// Parses a human-readable size such as `10MiB`, `500k` or `1024`.
pub(super) fn parse_max_size(max_size_str: &str) -> Result<u64, ConfigError> {
    Byte::from_str(max_size_str.trim())
        .map(|b| b.as_u64())
        .map_err(|e| ConfigError::InvalidValue {
            name: "--max-size".to_string(),
            reason: format!("invalid size format '{}': {}", max_size_str, e),
        })
}

/// Validates a full 40-character commit hash, returning it lowercased.
pub(super) fn parse_commit(commit: &str) -> Result<String, ConfigError> {
    let commit = commit.trim();
    if super::source::is_commit_hash(commit) {
        Ok(commit.to_ascii_lowercase())
    } else {
        Err(ConfigError::InvalidValue {
            name: "--commit".to_string(),
            reason: format!("'{}' is not a 40-character hexadecimal hash", commit),
        })
    }
}

/// Splits user-supplied pattern arguments on commas and whitespace and
/// normalizes each to a `/`-separated pattern relative to the root.
pub(super) fn split_patterns<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .flat_map(|arg| {
            arg.as_ref()
                .split(|c: char| c == ',' || c.is_whitespace())
                .map(|p| p.replace('\\', "/"))
                .map(|p| p.trim_start_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// A trailing `/` on an include pattern means "everything below".
pub(super) fn normalize_include(pattern: String) -> String {
    match pattern.strip_suffix('/') {
        Some(dir) if !dir.is_empty() => format!("{dir}/**"),
        _ => pattern,
    }
}

/// A trailing `/` on an exclude pattern names the directory itself, which
/// prunes everything below it.
pub(super) fn normalize_exclude(pattern: String) -> String {
    let trimmed = pattern.trim_end_matches('/');
    if trimmed.is_empty() {
        pattern
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_max_size() -> anyhow::Result<()> {
        // 'k' is an SI prefix
        assert_eq!(parse_max_size("10k")?, 10 * 1000);
        assert_eq!(parse_max_size("2MiB")?, 2 * 1024 * 1024);
        assert_eq!(parse_max_size("1024")?, 1024);
        Ok(())
    }

    #[test]
    fn test_parse_invalid_max_size() {
        let err = parse_max_size("lots").unwrap_err();
        assert!(err.to_string().contains("--max-size"));
    }

    #[test]
    fn test_parse_commit() {
        let hash = "ABCDEF0123456789abcdef0123456789ABCDEF01";
        assert_eq!(parse_commit(hash).unwrap(), hash.to_ascii_lowercase());
        assert!(parse_commit("abc123").is_err());
        assert!(parse_commit(&"g".repeat(40)).is_err());
    }

    #[test]
    fn test_split_patterns() {
        let split = split_patterns(["*.py, src/lib.rs", "/docs\\api  tests/"]);
        assert_eq!(split, vec!["*.py", "src/lib.rs", "docs/api", "tests/"]);
        assert!(split_patterns([" , "]).is_empty());
    }

    #[test]
    fn test_directory_suffix_normalization() {
        assert_eq!(normalize_include("src/".into()), "src/**");
        assert_eq!(normalize_include("*.rs".into()), "*.rs");
        assert_eq!(normalize_exclude("build/".into()), "build");
        assert_eq!(normalize_exclude("build".into()), "build");
    }
}
