//! Integration tests for CLI

use assert_cmd::Command;
use git2::Repository;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn srcpack(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("srcpack"));
    cmd.current_dir(dir);
    for var in ["EXCLUDE", "INCLUDE", "NO_IGNORE", "HIDDEN", "FORMAT"] {
        cmd.env_remove(format!("SRCPACK_{}", var));
    }
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn go_repo() -> TempDir {
    let temp = TempDir::new().expect("tmp");
    Repository::init(temp.path()).expect("git init");
    write(temp.path(), ".gitignore", "vendor/\n");
    write(temp.path(), "main.go", "package main\n");
    write(temp.path(), "src/app.go", "package src\n");
    write(temp.path(), "vendor/lib/lib.go", "package lib\n");
    temp
}

#[test]
fn test_cli_version() {
    let temp = TempDir::new().expect("tmp");
    srcpack(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("srcpack"));
}

#[test]
fn test_cli_help() {
    let temp = TempDir::new().expect("tmp");
    srcpack(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pack multiple source files"))
        .stdout(predicate::str::contains("--from-stdin-0"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_no_targets_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    srcpack(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no target paths provided, and no input from stdin specified",
        ));
}

#[test]
fn test_conflicting_stdin_modes() {
    let temp = TempDir::new().expect("tmp");
    srcpack(temp.path())
        .args(["-0", "-l"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_format_is_an_error() {
    let repo = go_repo();
    srcpack(repo.path())
        .args(["-f", "html", "main.go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn test_invalid_exclude_pattern_is_an_error() {
    let repo = go_repo();
    srcpack(repo.path())
        .args(["-E", "src/[", "main.go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid exclude pattern"));
}

#[test]
fn test_markdown_output() {
    let repo = go_repo();
    let output = srcpack(repo.path()).arg("**/*.go").output().expect("run");
    assert!(output.status.success());

    similar_asserts::assert_eq!(
        String::from_utf8(output.stdout).expect("utf8"),
        "- main.go\n```go\npackage main\n```\n\n- src/app.go\n```go\npackage src\n```\n\n"
    );
}

#[test]
fn test_org_output_to_file() {
    let repo = go_repo();
    write(repo.path(), "notes.org", "* Heading\ntext\n");

    srcpack(repo.path())
        .args(["-f", "org", "-o", "out.org", "notes.org"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(repo.path().join("out.org")).expect("output file");
    similar_asserts::assert_eq!(
        written,
        "- notes.org\n#+BEGIN_SRC org\n,* Heading\ntext\n#+END_SRC\n\n"
    );
}

#[test]
fn test_dry_run_lists_planned_files() {
    let repo = go_repo();
    write(repo.path(), "README.md", "# readme\n");

    srcpack(repo.path())
        .args(["--dry-run", "--include", "vendor/lib/lib.go", "*"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[Dry Run] Planning to process files using the 'markdown' format:",
        ))
        .stdout(predicate::str::contains("markdown  README.md\n"))
        .stdout(predicate::str::contains("go        main.go\n"))
        .stdout(predicate::str::contains("go        vendor/lib/lib.go\n"))
        .stdout(predicate::str::contains("[Dry Run] Total: 3"));
}

#[test]
fn test_dry_run_with_nothing_to_do() {
    let repo = go_repo();
    srcpack(repo.path())
        .args(["--dry-run", "*.rs"])
        .assert()
        .success()
        .stdout("[Dry Run] No files to be processed.\n");
}

#[test]
fn test_targets_from_stdin() {
    let repo = go_repo();
    srcpack(repo.path())
        .args(["--dry-run", "-0"])
        .write_stdin("main.go\0src/app.go\0")
        .assert()
        .success()
        .stdout(predicate::str::contains("main.go"))
        .stdout(predicate::str::contains("src/app.go"))
        .stdout(predicate::str::contains("Total: 2"));

    srcpack(repo.path())
        .args(["--dry-run", "-l", "main.go"])
        .write_stdin("src/app.go\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 2"));
}

#[test]
fn test_unrestricted_includes_hidden_and_ignored() {
    let repo = go_repo();
    write(repo.path(), ".env", "KEY=1\n");

    srcpack(repo.path())
        .args(["--dry-run", "-u", "**"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".env"))
        .stdout(predicate::str::contains("vendor/lib/lib.go"));
}

#[test]
fn test_config_file_and_environment() {
    let repo = go_repo();
    write(repo.path(), "srcpack.toml", "exclude = [\"src/**\"]\nformat = \"org\"\n");

    srcpack(repo.path())
        .args(["--dry-run", "**/*.go"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'org' format"))
        .stdout(predicate::str::contains("src/app.go").not());

    // CLI beats environment beats file
    srcpack(repo.path())
        .env("SRCPACK_FORMAT", "md")
        .args(["--dry-run", "**/*.go"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'md' format"));

    srcpack(repo.path())
        .env("SRCPACK_FORMAT", "md")
        .args(["--dry-run", "-f", "markdown", "-E", "main.go", "**/*.go"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'markdown' format"))
        .stdout(predicate::str::contains("src/app.go"))
        .stdout(predicate::str::contains("main.go").not());
}

#[test]
fn test_explicit_config_must_exist() {
    let repo = go_repo();
    srcpack(repo.path())
        .args(["--config", "missing.toml", "main.go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_unreadable_output_path_fails() {
    let repo = go_repo();
    srcpack(repo.path())
        .args(["-o", "no/such/dir/out.md", "main.go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to create output file"));
}

#[test]
fn test_shell_completions() {
    let temp = TempDir::new().expect("tmp");
    srcpack(temp.path())
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("srcpack"));
}
