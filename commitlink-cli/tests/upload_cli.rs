//! Process-level behaviour of `commitlink git-metadata upload`.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn git(dir: &Path, args: &[&str]) {
    let status = StdCommand::new("git")
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

fn repo_with_commit() -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(
        dir.path(),
        &["remote", "add", "origin", "https://github.com/org/repo.git"],
    );
    std::fs::write(dir.path().join("README.md"), "hello\n").unwrap();
    git(dir.path(), &["add", "README.md"]);
    git(dir.path(), &["commit", "-q", "-m", "init"]);
    dir
}

/// `commitlink` with a scrubbed environment pointing at an unreachable API.
fn commitlink() -> Command {
    let mut cmd = Command::cargo_bin("commitlink").unwrap();
    cmd.env_remove("COMMITLINK_API_KEY")
        .env_remove("COMMITLINK_SITE")
        .env_remove("COMMITLINK_INTAKE_URL")
        .env_remove("RUST_LOG")
        .env("COMMITLINK_API_HOST", "http://127.0.0.1:9")
        .env("NO_COLOR", "1");
    cmd
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn missing_api_key_exits_one() {
    let repo = repo_with_commit();
    commitlink()
        .current_dir(repo.path())
        .args(["git-metadata", "upload"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Missing COMMITLINK_API_KEY in your environment",
        ))
        .stdout(predicate::str::contains("Uploading").not());
}

#[test]
fn unusable_directory_exits_one() {
    commitlink()
        .env("COMMITLINK_API_KEY", "k")
        .args([
            "git-metadata",
            "upload",
            "--directory",
            "/nonexistent/commitlink/checkout",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("cannot use directory"));
}

#[test]
fn invalid_site_exits_one() {
    commitlink()
        .env("COMMITLINK_API_KEY", "k")
        .env("COMMITLINK_SITE", "not a host/")
        .args(["git-metadata", "upload"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid site"));
}

#[test]
fn missing_api_key_is_reported_before_invalid_site() {
    commitlink()
        .env("COMMITLINK_SITE", "not a host/")
        .args(["git-metadata", "upload"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Missing COMMITLINK_API_KEY"))
        .stdout(predicate::str::contains("invalid site").not());
}

#[test]
fn api_key_is_not_accepted_as_a_flag() {
    commitlink()
        .args(["git-metadata", "upload", "--api-key", "secret"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--api-key"));
}

#[test]
fn dry_run_without_gitdb_succeeds_offline() {
    let repo = repo_with_commit();
    commitlink()
        .env("COMMITLINK_API_KEY", "k")
        .args(["git-metadata", "upload", "--dry-run", "--no-gitsync", "--directory"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY-RUN MODE ENABLED"))
        .stdout(predicate::str::contains("[DRYRUN] Successfully uploaded tracked files"))
        .stdout(predicate::str::contains("github.com/org/repo.git"))
        .stdout(predicate::str::contains("Syncing GitDB").not());
}

#[test]
fn verbose_switches_logging_to_debug() {
    let repo = repo_with_commit();
    commitlink()
        .env("COMMITLINK_API_KEY", "k")
        .current_dir(repo.path())
        .args(["git-metadata", "upload", "--dry-run", "--no-gitsync", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DEBUG"))
        .stdout(predicate::str::contains("resolved endpoints"));
}

#[test]
fn deprecated_git_sync_flag_is_accepted() {
    let repo = repo_with_commit();
    commitlink()
        .env("COMMITLINK_API_KEY", "k")
        .current_dir(repo.path())
        .args(["git-metadata", "upload", "--dry-run", "--no-gitsync", "--git-sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--git-sync is deprecated"));
}

#[test]
fn help_lists_public_flags_only() {
    commitlink()
        .args(["git-metadata", "upload", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--no-gitsync"))
        .stdout(predicate::str::contains("--directory"))
        .stdout(predicate::str::contains("--repository-url"))
        .stdout(predicate::str::contains("--api-key").not());
}
