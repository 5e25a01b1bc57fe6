// src/tree/notebook.rs

//! Jupyter notebooks are JSON; the digest shows them as a Python script with
//! markdown cells turned into docstrings.

use serde::Deserialize;

const HEADER: &str = "# Jupyter notebook converted to Python script.";

#[derive(Deserialize)]
struct Notebook {
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: Source,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Source {
    Lines(Vec<String>),
    Text(String),
}

impl Default for Source {
    fn default() -> Self {
        Source::Text(String::new())
    }
}

impl Source {
    fn into_text(self) -> String {
        match self {
            Source::Lines(lines) => lines.concat(),
            Source::Text(text) => text,
        }
    }
}

/// Renders notebook JSON as a script. Malformed notebooks yield an error line.
pub(super) fn render(bytes: &[u8]) -> String {
    let notebook: Notebook = match serde_json::from_slice(bytes) {
        Ok(notebook) => notebook,
        Err(e) => return format!("Error processing notebook: {e}"),
    };

    let mut blocks = vec![HEADER.to_string()];
    for cell in notebook.cells {
        let source = cell.source.into_text();
        let source = source.trim_end();
        if source.is_empty() {
            continue;
        }
        match cell.cell_type.as_str() {
            "code" => blocks.push(source.to_string()),
            _ => blocks.push(format!("\"\"\"\n{source}\n\"\"\"")),
        }
    }
    blocks.join("\n\n") + "\n"
}
