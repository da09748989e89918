//! Git working-tree access.
//!
//! Every query shells out to `git` with the repository root as the working
//! directory. Multi-field output uses the ASCII unit separator (`0x1f`)
//! between fields and the record separator (`0x1e`) between commits so that
//! names and subjects may contain any printable character.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, FixedOffset};

use commitlink_core::types::{CommitHash, CommitPayload, CommitRecord, RepositoryUrl, Signature};

use crate::error::GitError;

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// `%H %an %ae %aI %cn %ce %cI %P %s`, separated by 0x1f, terminated by 0x1e.
const COMMIT_FORMAT: &str = "--format=%H%x1f%an%x1f%ae%x1f%aI%x1f%cn%x1f%ce%x1f%cI%x1f%P%x1f%s%x1e";

/// A git working tree rooted at [`GitRepository::root`].
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `dir`.
    ///
    /// Fails with [`GitError::NotARepository`] if `dir` is not inside a work tree.
    pub fn open(dir: &Path) -> Result<Self, GitError> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(dir)
            .output()
            .map_err(GitError::Spawn)?;
        if !output.status.success() {
            return Err(GitError::NotARepository {
                path: dir.to_path_buf(),
            });
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            return Err(GitError::NotARepository {
                path: dir.to_path_buf(),
            });
        }
        tracing::debug!("opened git repository at {root}");
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// SHA of `HEAD`.
    pub fn head(&self) -> Result<CommitHash, GitError> {
        let sha = self.git(&["rev-parse", "HEAD"])?.trim().to_string();
        if sha.is_empty() {
            return Err(GitError::Parse {
                command: "rev-parse HEAD".into(),
                detail: "empty output".into(),
            });
        }
        Ok(CommitHash(sha))
    }

    /// Current branch name, or `None` when HEAD is detached.
    pub fn branch(&self) -> Result<Option<String>, GitError> {
        let name = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?.trim().to_string();
        Ok(match name.as_str() {
            "" | "HEAD" => None,
            _ => Some(name),
        })
    }

    /// Fetch URL of `origin`, or of the first remote if there is no `origin`.
    ///
    /// Credentials embedded in the URL are removed.
    pub fn remote_url(&self) -> Result<RepositoryUrl, GitError> {
        let remotes = self.git(&["remote"])?;
        let names: Vec<&str> = remotes.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let name = names
            .iter()
            .copied()
            .find(|n| *n == "origin")
            .or_else(|| names.first().copied())
            .ok_or(GitError::NoRemote)?;
        let url = self.git(&["remote", "get-url", name])?;
        Ok(RepositoryUrl::without_credentials(&url))
    }

    /// Paths of all files in the index, relative to the root.
    pub fn tracked_files(&self) -> Result<Vec<String>, GitError> {
        let out = self.git(&["ls-files", "-z"])?;
        Ok(out
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Build the payload for the tracked-file upload from the current HEAD.
    pub fn commit_payload(
        &self,
        repository_url: Option<&RepositoryUrl>,
    ) -> Result<CommitPayload, GitError> {
        let repository_url = match repository_url {
            Some(url) => url.clone(),
            None => self.remote_url()?,
        };
        let head = self.head()?;
        let out = self.git(&["show", "-s", COMMIT_FORMAT, head.as_str()])?;
        let record = parse_records(&out, "show")?
            .into_iter()
            .next()
            .ok_or_else(|| GitError::Parse {
                command: "show".into(),
                detail: format!("no commit returned for {head}"),
            })?;

        Ok(CommitPayload {
            repository_url,
            hash: record.hash,
            branch: self.branch()?,
            author: record.author,
            committer: record.committer,
            message: record.message,
            tracked_files: self.tracked_files()?,
        })
    }

    /// Up to `limit` commits reachable from HEAD, newest first.
    ///
    /// `since` is passed to `git log --since` verbatim (e.g. `"1 month ago"`).
    pub fn recent_commits(
        &self,
        limit: usize,
        since: Option<&str>,
    ) -> Result<Vec<CommitRecord>, GitError> {
        let max_count = format!("--max-count={limit}");
        let since_arg = since.map(|s| format!("--since={s}"));
        let mut args = vec!["log", COMMIT_FORMAT, max_count.as_str()];
        if let Some(since_arg) = since_arg.as_deref() {
            args.push(since_arg);
        }
        let out = self.git(&args)?;
        parse_records(&out, "log")
    }

    fn git(&self, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(GitError::Spawn)?;

        if !output.status.success() {
            return Err(GitError::Command {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ---------------------------------------------------------------------------
// Output parsing
// ---------------------------------------------------------------------------

fn parse_records(out: &str, command: &str) -> Result<Vec<CommitRecord>, GitError> {
    out.split(RECORD_SEP)
        .map(|r| r.trim_matches(|c| c == '\n' || c == '\r'))
        .filter(|r| !r.is_empty())
        .map(|r| parse_record(r, command))
        .collect()
}

fn parse_record(record: &str, command: &str) -> Result<CommitRecord, GitError> {
    let fields: Vec<&str> = record.splitn(9, FIELD_SEP).collect();
    let [hash, an, ae, ad, cn, ce, cd, parents, subject] = fields[..] else {
        return Err(GitError::Parse {
            command: command.into(),
            detail: format!("expected 9 fields, got {}", fields.len()),
        });
    };

    Ok(CommitRecord {
        hash: CommitHash::from(hash),
        parents: parents.split_whitespace().map(CommitHash::from).collect(),
        author: Signature {
            name: an.to_owned(),
            email: ae.to_owned(),
            date: parse_date(ad, command)?,
        },
        committer: Signature {
            name: cn.to_owned(),
            email: ce.to_owned(),
            date: parse_date(cd, command)?,
        },
        message: subject.to_owned(),
    })
}

fn parse_date(raw: &str, command: &str) -> Result<DateTime<FixedOffset>, GitError> {
    DateTime::parse_from_rfc3339(raw.trim()).map_err(|e| GitError::Parse {
        command: command.into(),
        detail: format!("bad date '{raw}': {e}"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
