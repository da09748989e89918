//! Error types for commitlink-git.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while deriving commit metadata from a working tree.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary could not be started.
    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    /// `git` ran but exited non-zero.
    #[error("`git {command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("{path} is not inside a git work tree")]
    NotARepository { path: PathBuf },

    /// No remote is configured and no repository URL override was given.
    #[error("could not determine the repository URL: no git remote found (use --repository-url)")]
    NoRemote,

    /// `git` output did not have the expected shape.
    #[error("unexpected output from `git {command}`: {detail}")]
    Parse { command: String, detail: String },
}
