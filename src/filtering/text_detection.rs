// src/filtering/text_detection.rs

use content_inspector::ContentType;
use std::str;

/// Checks if a byte buffer is likely text-based.
///
/// `content_inspector` provides the heuristic; anything it calls UTF-8 must
/// also decode as UTF-8. A multi-byte character cut off at the end of the
/// buffer does not count against it, since callers usually pass a prefix of
/// the file.
///
/// # Examples
/// ```
/// use repodigest::filtering::is_likely_text_from_buffer;
///
/// assert!(is_likely_text_from_buffer(b"This is valid UTF-8 text."));
/// assert!(!is_likely_text_from_buffer(b"This contains a null byte \0."));
/// assert!(!is_likely_text_from_buffer(&[0x48, 0x65, 0x6c, 0x6c, 0x80, 0x6f]));
/// // "é" truncated after its first byte
/// assert!(is_likely_text_from_buffer(&[b'c', b'a', b'f', 0xC3]));
/// ```
pub fn is_likely_text_from_buffer(buffer_slice: &[u8]) -> bool {
    match content_inspector::inspect(buffer_slice) {
        ContentType::UTF_8_BOM => true,
        ContentType::UTF_8 => match str::from_utf8(buffer_slice) {
            Ok(_) => true,
            // `error_len() == None` means the input simply ended mid-character.
            Err(e) => e.error_len().is_none(),
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_detect_utf8_bom_text() {
        let buffer = &[0xEF, 0xBB, 0xBF, b'h', b'i'];
        assert!(is_likely_text_from_buffer(buffer));
    }

    #[test]
    fn test_buffer_detect_invalid_utf8_sequence() {
        let buffer = &[0x48, 0x65, 0x6c, 0x6c, 0x80, 0x6f]; // "Hell\x80o"
        assert!(!is_likely_text_from_buffer(buffer));
    }

    #[test]
    fn test_buffer_detect_png_header() {
        let buffer = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(!is_likely_text_from_buffer(buffer));
    }

    #[test]
    fn test_buffer_empty_is_text() {
        assert!(is_likely_text_from_buffer(b""));
    }
}
