// src/tree/reader.rs

use super::notebook;
use super::FileBody;
use crate::constants::TEXT_DETECTION_CHUNK;
use crate::filtering::is_likely_text_from_buffer;
use log::debug;
use std::fs;
use std::path::Path;

/// Reads a file into a [`FileBody`].
///
/// Never fails: unreadable files become [`FileBody::Unreadable`]. Notebooks
/// (`.ipynb`) are rendered as a Python script.
pub fn read_body(path: &Path) -> FileBody {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            return FileBody::Unreadable;
        }
    };
    if bytes.is_empty() {
        return FileBody::Empty;
    }
    let head = &bytes[..bytes.len().min(TEXT_DETECTION_CHUNK)];
    if !is_likely_text_from_buffer(head) {
        return FileBody::Binary;
    }
    if path.extension().is_some_and(|e| e == "ipynb") {
        return FileBody::Text(notebook::render(&bytes));
    }
    FileBody::Text(String::from_utf8_lossy(&bytes).into_owned())
}
