//! CLI integration tests
//!
//! Run the `forkdiff` binary against a scratch repository with a `master`
//! branch and a fork branch, and check the written report and exit status.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;

const FORK_YAML: &str = r#"
title: "demo-fork"
def:
  title: "Fork changes"
  description: "Changes relative to upstream."
  sub:
    - title: "Go code"
      globs: ["*.go"]
"#;

/// Commits `files` as the parentless tip of `refs/heads/<branch>`.
fn commit(repo: &Repository, workdir: &Path, branch: &str, files: &[(&str, &str)]) {
    for entry in fs::read_dir(workdir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_file() {
            fs::remove_file(path).unwrap();
        }
    }
    for (name, content) in files {
        fs::write(workdir.join(name), content).unwrap();
    }
    let mut index = repo.index().unwrap();
    index.clear().unwrap();
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("forkdiff", "forkdiff@example.com").unwrap();
    repo.commit(Some(&format!("refs/heads/{branch}")), &sig, &sig, branch, &tree, &[])
        .unwrap();
}

fn setup_repo(temp_dir: &TempDir) -> std::path::PathBuf {
    let repo_dir = temp_dir.path().join("repo");
    fs::create_dir_all(&repo_dir).unwrap();
    let repo = Repository::init(&repo_dir).unwrap();
    commit(&repo, &repo_dir, "master", &[("a.go", "package a\n"), ("notes.md", "# Notes\n")]);
    commit(
        &repo,
        &repo_dir,
        "fork",
        &[("a.go", "package a\n\nfunc Fork() {}\n"), ("notes.md", "# Notes\n\nForked.\n")],
    );
    fs::write(temp_dir.path().join("fork.yaml"), FORK_YAML).unwrap();
    repo_dir
}

fn forkdiff(temp_dir: &TempDir, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_forkdiff"))
        .current_dir(temp_dir.path())
        .env_remove("RUST_LOG")
        .args(["--repo", "repo", "--base", "master", "--target", "fork", "--fork", "fork.yaml"])
        .args(extra)
        .output()
        .expect("failed to execute forkdiff")
}

#[test]
fn writes_markdown_report() {
    let temp_dir = TempDir::new().unwrap();
    setup_repo(&temp_dir);

    let output = forkdiff(&temp_dir, &["--out", "report.md"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report = fs::read_to_string(temp_dir.path().join("report.md")).unwrap();
    assert!(report.starts_with("# demo-fork\n"), "{report}");
    assert!(report.contains("## Go code"), "{report}");
    assert!(report.contains("diff --git master/a.go fork/a.go"), "{report}");
    assert!(report.contains("+func Fork() {}"), "{report}");
    assert!(report.contains("- `notes.md` (M, +2 -0)"), "{report}");
}

#[test]
fn writes_html_report_by_default_extension() {
    let temp_dir = TempDir::new().unwrap();
    setup_repo(&temp_dir);

    let output = forkdiff(&temp_dir, &["--out", "index.html"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let html = fs::read_to_string(temp_dir.path().join("index.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h2>Go code</h2>"));
    assert!(html.contains("<code>notes.md</code>"));
}

#[test]
fn unclaimed_files_fail_when_requested() {
    let temp_dir = TempDir::new().unwrap();
    setup_repo(&temp_dir);

    let output = forkdiff(&temp_dir, &["--out", "-", "--format", "markdown", "--fail-on-unclaimed"]);
    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## Unclaimed changes"), "{stdout}");
}

#[test]
fn coverage_gate_status_differs_from_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    setup_repo(&temp_dir);

    let usage = forkdiff(&temp_dir, &["--no-such-flag"]);
    assert_eq!(usage.status.code(), Some(2));
    let gated = forkdiff(&temp_dir, &["--out", "report.md", "--fail-on-unclaimed"]);
    assert_eq!(gated.status.code(), Some(3));
    assert!(temp_dir.path().join("report.md").exists());
}

#[test]
fn unknown_base_aborts_without_report() {
    let temp_dir = TempDir::new().unwrap();
    setup_repo(&temp_dir);

    let output = Command::new(env!("CARGO_BIN_EXE_forkdiff"))
        .current_dir(temp_dir.path())
        .args(["--repo", "repo", "--base", "no-such-branch", "--target", "fork", "--out", "report.md"])
        .output()
        .expect("failed to execute forkdiff");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-such-branch"), "stderr: {stderr}");
    assert!(!temp_dir.path().join("report.md").exists());
}

#[test]
fn invalid_glob_aborts_without_report() {
    let temp_dir = TempDir::new().unwrap();
    setup_repo(&temp_dir);
    fs::write(
        temp_dir.path().join("fork.yaml"),
        "title: t\ndef:\n  title: root\n  sub:\n    - title: Broken\n      globs: [\"[a-\"]\n",
    )
    .unwrap();

    let output = forkdiff(&temp_dir, &["--out", "report.md"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Broken"), "stderr: {stderr}");
    assert!(!temp_dir.path().join("report.md").exists());
}

#[test]
fn unknown_config_field_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    setup_repo(&temp_dir);
    fs::write(temp_dir.path().join("fork.yaml"), "title: t\ndef:\n  title: root\n  globz: []\n")
        .unwrap();

    let output = forkdiff(&temp_dir, &["--out", "report.md"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("globz"), "stderr: {stderr}");
}
