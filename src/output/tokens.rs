// src/output/tokens.rs

//! Token estimates for the rendered digest, using the `o200k_base` encoding.

use std::sync::OnceLock;
use tiktoken_rs::{o200k_base, CoreBPE};

static TOKENIZER: OnceLock<Option<CoreBPE>> = OnceLock::new();

const THRESHOLDS: [(usize, &str); 2] = [(1_000_000, "M"), (1_000, "k")];

fn tokenizer() -> Option<&'static CoreBPE> {
    TOKENIZER
        .get_or_init(|| match o200k_base() {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                log::warn!("Token estimation unavailable: {}", e);
                None
            }
        })
        .as_ref()
}

/// Number of tokens in `text`, or `None` if the tokenizer is unavailable.
///
/// Special-token text such as `<|endoftext|>` is counted as ordinary text.
pub fn estimate_tokens(text: &str) -> Option<usize> {
    tokenizer().map(|bpe| bpe.encode_ordinary(text).len())
}

/// Human-scaled count: `999`, `1.5k`, `2.3M`.
///
/// # Examples
/// ```
/// use repodigest::output::format_token_count;
///
/// assert_eq!(format_token_count(999), "999");
/// assert_eq!(format_token_count(1_234), "1.2k");
/// assert_eq!(format_token_count(2_300_000), "2.3M");
/// ```
pub fn format_token_count(tokens: usize) -> String {
    for (threshold, suffix) in THRESHOLDS {
        if tokens >= threshold {
            return format!("{:.1}{}", tokens as f64 / threshold as f64, suffix);
        }
    }
    tokens.to_string()
}
