//! Working-tree payload source.

use std::path::{Path, PathBuf};

use commitlink_core::{CommitPayload, CommitRecord, RepositoryUrl};
use commitlink_git::{GitError, GitRepository};

use crate::ports::PayloadProducer;

/// Reads commit metadata from the repository containing `dir`.
///
/// The repository is reopened on every call, so each caller sees the tree as
/// it is at that moment.
#[derive(Debug, Clone)]
pub struct WorkTreeSource {
    dir: PathBuf,
    repository_url: Option<RepositoryUrl>,
}

impl WorkTreeSource {
    pub fn new(dir: &Path, repository_url: Option<RepositoryUrl>) -> Self {
        Self {
            dir: dir.to_path_buf(),
            repository_url,
        }
    }

    /// Repository URL (override first) and recent history.
    pub fn history(
        &self,
        limit: usize,
        since: Option<&str>,
    ) -> Result<(RepositoryUrl, Vec<CommitRecord>), GitError> {
        let repo = GitRepository::open(&self.dir)?;
        let url = match &self.repository_url {
            Some(url) => url.clone(),
            None => repo.remote_url()?,
        };
        Ok((url, repo.recent_commits(limit, since)?))
    }
}

impl PayloadProducer for WorkTreeSource {
    fn produce(&self) -> Result<CommitPayload, GitError> {
        GitRepository::open(&self.dir)?.commit_payload(self.repository_url.as_ref())
    }
}
