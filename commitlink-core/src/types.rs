//! Domain types for commit metadata reporting.
//!
//! Payloads are produced once per run by the git adapter and never mutated
//! afterwards. Outcome types live only for the duration of a run.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A repository URL as reported to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryUrl(pub String);

impl RepositoryUrl {
    /// Build a URL with any `user[:password]@` segment removed.
    ///
    /// Only URLs with a `scheme://` prefix can carry credentials; scp-style
    /// remotes (`git@host:org/repo.git`) are returned unchanged.
    pub fn without_credentials(raw: &str) -> Self {
        let raw = raw.trim();
        let Some((scheme, rest)) = raw.split_once("://") else {
            return Self(raw.to_owned());
        };
        let authority_end = rest.find('/').unwrap_or(rest.len());
        let (authority, path) = rest.split_at(authority_end);
        match authority.rfind('@') {
            Some(at) => Self(format!("{scheme}://{}{path}", &authority[at + 1..])),
            None => Self(raw.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepositoryUrl {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepositoryUrl {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A full 40-character commit SHA.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitHash(pub String);

impl CommitHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First seven characters, for log lines.
    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CommitHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CommitHash {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Commit metadata
// ---------------------------------------------------------------------------

/// Author or committer identity attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub date: DateTime<FixedOffset>,
}

/// Everything the tracked-file channel reports about the current commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPayload {
    pub repository_url: RepositoryUrl,
    pub hash: CommitHash,
    /// `None` when HEAD is detached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
    /// Paths relative to the repository root, as listed by the index.
    pub tracked_files: Vec<String>,
}

/// A single commit from history, as synced to the git metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: CommitHash,
    #[serde(default)]
    pub parents: Vec<CommitHash>,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Run outcomes
// ---------------------------------------------------------------------------

/// Result of one upload channel within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOutcome {
    Success,
    Failed,
    #[default]
    Skipped,
}

impl fmt::Display for ChannelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelOutcome::Success => write!(f, "success"),
            ChannelOutcome::Failed => write!(f, "failed"),
            ChannelOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Aggregate of both channel outcomes for one run.
///
/// Only the tracked-file channel decides the exit code; the GitDB channel is
/// advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub tracked_files: ChannelOutcome,
    pub gitdb: ChannelOutcome,
    pub elapsed: Duration,
}

impl RunResult {
    pub fn is_failure(&self) -> bool {
        self.tracked_files == ChannelOutcome::Failed
    }

    pub fn exit_code(&self) -> u8 {
        u8::from(self.is_failure())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
