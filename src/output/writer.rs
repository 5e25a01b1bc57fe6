// src/output/writer.rs

//! Writes the rendered digest to its destination.

use super::Digest;
use crate::config::OutputDestination;
use crate::errors::{io_error_with_path, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Writes `"{tree}\n{content}"` to a file or standard output.
///
/// # Errors
/// Returns an I/O error if the file cannot be created or written.
pub fn write_digest(digest: &Digest, destination: &OutputDestination) -> Result<()> {
    match destination {
        OutputDestination::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_to(&mut handle, digest).map_err(|e| io_error_with_path(e, "<stdout>"))
        }
        OutputDestination::File(path) => {
            let file = File::create(path).map_err(|e| io_error_with_path(e, path))?;
            let mut writer = BufWriter::new(file);
            write_to(&mut writer, digest).map_err(|e| io_error_with_path(e, path))?;
            log::debug!("Digest written to {}", path.display());
            Ok(())
        }
    }
}

fn write_to(writer: &mut dyn Write, digest: &Digest) -> io::Result<()> {
    writer.write_all(digest.text().as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_digest_to_file() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("digest.txt");
        let digest = Digest {
            summary: "Directory: x\n".into(),
            tree: "Directory structure:\n└── x/\n".into(),
            content: "body".into(),
        };
        write_digest(&digest, &OutputDestination::File(path.clone()))?;
        assert_eq!(fs::read_to_string(path)?, "Directory structure:\n└── x/\n\nbody");
        Ok(())
    }

    #[test]
    fn test_write_digest_to_missing_directory_fails() {
        let digest = Digest::default();
        let destination = OutputDestination::File("/nonexistent-dir/for/sure/out.txt".into());
        assert!(write_digest(&digest, &destination).is_err());
    }
}
