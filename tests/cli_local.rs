// tests/cli_local.rs

mod common;

use assert_cmd::prelude::*;
use common::{create_file, repodigest_cmd};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_no_args_writes_digest_txt_in_current_dir() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "hello.txt", "Hello")?;

    repodigest_cmd()
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Analysis complete! Output written to: digest.txt"))
        .stdout(predicate::str::contains("Files analyzed: 1"))
        .stdout(predicate::str::contains("Estimated tokens:"));

    let written = fs::read_to_string(temp.path().join("digest.txt"))?;
    assert!(written.starts_with("Directory structure:\n"));
    assert!(written.contains("FILE: hello.txt\n"));
    assert!(written.contains("Hello"));

    temp.close()?;
    Ok(())
}

#[test]
fn test_second_run_ignores_previous_digest() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "a.txt", "A")?;

    repodigest_cmd().current_dir(temp.path()).assert().success();
    repodigest_cmd()
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files analyzed: 1"));

    let written = fs::read_to_string(temp.path().join("digest.txt"))?;
    assert!(!written.contains("FILE: digest.txt"));
    Ok(())
}

#[test]
fn test_output_dash_streams_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let project = temp.path().join("project");
    create_file(&project, "src/main.rs", "fn main() {}\n")?;
    create_file(&project, "README.md", "# Project\n")?;

    repodigest_cmd()
        .arg(project.to_str().unwrap())
        .args(["-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Directory structure:\n└── project/\n"))
        .stdout(predicate::str::contains("    └── src/\n        └── main.rs\n"))
        .stdout(predicate::str::contains("FILE: src/main.rs\n"))
        .stderr(predicate::str::contains("Directory: project"))
        .stderr(predicate::str::contains("Files analyzed: 2"));

    assert!(!project.join("digest.txt").exists());
    Ok(())
}

#[test]
fn test_output_to_named_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let src = temp.path().join("src");
    create_file(&src, "a.txt", "Content A")?;
    let output = temp.path().join("out.txt");

    repodigest_cmd()
        .arg(src.to_str().unwrap())
        .arg("-o")
        .arg(output.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains(output.to_str().unwrap()));

    let written = fs::read_to_string(&output)?;
    assert!(written.contains("└── src/\n    └── a.txt\n"));
    assert!(written.contains("FILE: a.txt\n"));
    assert!(written.contains("Content A"));
    Ok(())
}

#[test]
fn test_single_file_source() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "notes.md", "one\ntwo\nthree\n")?;

    repodigest_cmd()
        .arg(temp.path().join("notes.md").to_str().unwrap())
        .args(["-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Directory structure:\n└── notes.md\n"))
        .stderr(predicate::str::contains("File: notes.md\nLines: 3"));
    Ok(())
}

#[test]
fn test_json_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    create_file(temp.path(), "lib.rs", "pub fn f() {}\n")?;

    let output = repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .arg("--json")
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(value["summary"].as_str().unwrap().contains("Files analyzed: 1"));
    assert!(value["tree"].as_str().unwrap().contains("lib.rs"));
    assert!(value["content"].as_str().unwrap().contains("pub fn f() {}"));
    assert!(!temp.path().join("digest.txt").exists());
    Ok(())
}

#[test]
fn test_invalid_source_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    repodigest_cmd()
        .arg("definitely/not/a/path")
        .current_dir(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid source"));
    Ok(())
}

#[test]
fn test_invalid_commit_fails() -> Result<(), Box<dyn std::error::Error>> {
    repodigest_cmd()
        .args(["https://github.com/owner/repo", "--commit", "abc123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--commit"));
    Ok(())
}

#[test]
fn test_invalid_max_size_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    repodigest_cmd()
        .arg(temp.path().to_str().unwrap())
        .args(["-s", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-size"));
    Ok(())
}

#[test]
fn test_empty_directory_reports_no_files() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::create_dir(temp.path().join("empty"))?;

    repodigest_cmd()
        .arg(temp.path().join("empty").to_str().unwrap())
        .args(["-o", "-"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("No files found"));
    Ok(())
}
