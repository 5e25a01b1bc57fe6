// tests/content_processing.rs

mod common;

use assert_cmd::prelude::*;
use common::{create_file, repodigest_cmd};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const RUST_SOURCE: &str = "/// Entry point.\nfn main() {\n    run(); // go\n    /* later */\n}\n";

#[test]
fn test_comments_kept_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "main.rs", RUST_SOURCE)?;

    repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .args(["-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUST_SOURCE));
    Ok(())
}

#[test]
fn test_remove_comments_strips_every_kind() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "main.rs", RUST_SOURCE)?;

    repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .args(["-o", "-", "--remove-comments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nfn main() {\n    run(); \n    \n}\n"))
        .stdout(predicate::str::contains("Entry point").not())
        .stdout(predicate::str::contains("// go").not())
        .stdout(predicate::str::contains("later").not());
    Ok(())
}

#[test]
fn test_comment_types_limit_removal() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "main.rs", RUST_SOURCE)?;

    repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .args(["-o", "-", "-c", "--comment-types", "documentation,multi_line"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry point").not())
        .stdout(predicate::str::contains("later").not())
        .stdout(predicate::str::contains("run(); // go"));
    Ok(())
}

#[test]
fn test_python_docstrings_and_hash_comments() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(
        temp.path(),
        "tool.py",
        "\"\"\"Module doc.\"\"\"\nimport os  # stdlib\nPATH = \"# not a comment\"\n",
    )?;

    repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .args(["-o", "-", "-c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Module doc").not())
        .stdout(predicate::str::contains("# stdlib").not())
        .stdout(predicate::str::contains("PATH = \"# not a comment\""));
    Ok(())
}

#[test]
fn test_unsupported_files_are_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "notes.txt", "# heading\n// not code\n")?;

    repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .args(["-o", "-", "-c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# heading\n// not code\n"));
    Ok(())
}

#[test]
fn test_unterminated_comment_keeps_original_content() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "broken.c", "int x; // note\n/* never closed\n")?;
    create_file(temp.path(), "ok.c", "int y; // gone\n")?;

    repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .args(["-o", "-", "-c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("int x; // note\n/* never closed\n"))
        .stdout(predicate::str::contains("// gone").not());
    Ok(())
}

#[test]
fn test_binary_and_empty_files_get_markers() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("blob.bin"), [0u8, 159, 146, 150, 0, 1, 2])?;
    fs::write(temp.path().join("empty.txt"), "")?;

    repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .args(["-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE: blob.bin\n================================================\n[Binary file]"))
        .stdout(predicate::str::contains("FILE: empty.txt\n================================================\n[Empty file]"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_listed_not_followed() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::symlink;
    let temp = tempdir()?;
    create_file(temp.path(), "real.txt", "Real content")?;
    symlink(temp.path().join("real.txt"), temp.path().join("link.txt"))?;

    repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .args(["-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("link.txt -> real.txt"))
        .stdout(predicate::str::contains("SYMLINK: link.txt -> real.txt"))
        .stdout(predicate::str::contains("Real content").count(1));
    Ok(())
}
