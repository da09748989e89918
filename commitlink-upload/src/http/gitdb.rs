//! GitDB sync over the repository API.
//!
//! 1. Re-read recent history from the working tree.
//! 2. `search_commits`: ask which of those commits the store already has.
//! 3. `commits`: upload the rest, unless this is a dry run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use commitlink_core::{ApiKey, CommitRecord, RepositoryUrl};

use crate::error::{TransportError, UploadError};
use crate::http::{check, read_json, API_KEY_HEADER};
use crate::ports::{GitDbReport, GitDbSync};
use crate::source::WorkTreeSource;

/// Most commits considered per sync.
pub const COMMIT_LIMIT: usize = 1000;

/// History window passed to `git log --since`.
pub const LOOKBACK: &str = "1 month ago";

#[derive(Serialize)]
struct Meta<'a> {
    repository_url: &'a str,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    meta: Meta<'a>,
    data: Vec<CommitRef<'a>>,
}

#[derive(Serialize)]
struct CommitRef<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<KnownCommit>,
}

#[derive(Deserialize)]
struct KnownCommit {
    id: String,
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    meta: Meta<'a>,
    data: Vec<CommitDocument<'a>>,
}

#[derive(Serialize)]
struct CommitDocument<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    attributes: &'a CommitRecord,
}

pub struct HttpGitDb {
    agent: ureq::Agent,
    search_url: String,
    upload_url: String,
    api_key: ApiKey,
    source: WorkTreeSource,
}

impl HttpGitDb {
    pub fn new(agent: ureq::Agent, api_base: &str, api_key: ApiKey, source: WorkTreeSource) -> Self {
        Self {
            agent,
            search_url: format!("{api_base}/api/v2/git/repository/search_commits"),
            upload_url: format!("{api_base}/api/v2/git/repository/commits"),
            api_key,
            source,
        }
    }

    fn search_commits(
        &self,
        url: &RepositoryUrl,
        commits: &[CommitRecord],
    ) -> Result<HashSet<String>, TransportError> {
        let request = SearchRequest {
            meta: Meta {
                repository_url: url.as_str(),
            },
            data: commits
                .iter()
                .map(|c| CommitRef {
                    id: c.hash.as_str(),
                    kind: "commit",
                })
                .collect(),
        };
        let result = self
            .agent
            .post(&self.search_url)
            .set(API_KEY_HEADER, self.api_key.expose())
            .send_json(request);
        let response: SearchResponse = read_json(&self.search_url, check(&self.search_url, result)?)?;
        Ok(response.data.into_iter().map(|c| c.id).collect())
    }

    fn upload_commits(
        &self,
        url: &RepositoryUrl,
        commits: &[&CommitRecord],
    ) -> Result<(), TransportError> {
        let request = UploadRequest {
            meta: Meta {
                repository_url: url.as_str(),
            },
            data: commits
                .iter()
                .map(|c| CommitDocument {
                    id: c.hash.as_str(),
                    kind: "commit",
                    attributes: *c,
                })
                .collect(),
        };
        let result = self
            .agent
            .post(&self.upload_url)
            .set(API_KEY_HEADER, self.api_key.expose())
            .send_json(request);
        check(&self.upload_url, result).map(|_| ())
    }
}

impl GitDbSync for HttpGitDb {
    fn sync(&self, dry_run: bool) -> Result<GitDbReport, UploadError> {
        let (url, commits) = self.source.history(COMMIT_LIMIT, Some(LOOKBACK))?;
        if commits.is_empty() {
            tracing::debug!("no recent commits to sync");
            return Ok(GitDbReport::default());
        }

        let known = self.search_commits(&url, &commits)?;
        let missing: Vec<&CommitRecord> = commits
            .iter()
            .filter(|c| !known.contains(c.hash.as_str()))
            .collect();
        let known = commits.len() - missing.len();

        if missing.is_empty() {
            tracing::debug!("GitDB already has all {known} recent commits");
            return Ok(GitDbReport {
                known,
                ..Default::default()
            });
        }
        if dry_run {
            tracing::info!("[DRYRUN] would sync {} commits to GitDB", missing.len());
            return Ok(GitDbReport {
                known,
                uploaded: 0,
                pending: missing.len(),
            });
        }

        self.upload_commits(&url, &missing)?;
        tracing::debug!("synced {} commits to GitDB", missing.len());
        Ok(GitDbReport {
            known,
            uploaded: missing.len(),
            pending: 0,
        })
    }
}
