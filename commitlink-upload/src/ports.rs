//! Capabilities the orchestrator consumes.
//!
//! Production implementations live in [`crate::http`]; tests substitute fakes.

use std::path::Path;

use commitlink_core::{ApiKey, CommitPayload, RepositoryUrl};
use commitlink_git::GitError;

use crate::error::{TransportError, UploadError};
use crate::telemetry::Series;

/// Derives the tracked-file payload from the working tree.
pub trait PayloadProducer {
    fn produce(&self) -> Result<CommitPayload, GitError>;
}

/// Delivers the tracked-file payload.
pub trait PayloadSender {
    /// Send once. `attempt` is 1-based so the sender can back off before
    /// attempts after the first.
    fn send(&self, payload: &CommitPayload, attempt: u32) -> Result<(), TransportError>;
}

/// What a GitDB sync did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GitDbReport {
    /// Commits the store already had.
    pub known: usize,
    /// Commits written by this sync.
    pub uploaded: usize,
    /// Commits that a dry run left unwritten.
    pub pending: usize,
}

/// Synchronises recent commit history with the git metadata store.
pub trait GitDbSync {
    /// Re-derives commit data from the working tree and sends what the store
    /// lacks. In a dry run nothing is written.
    fn sync(&self, dry_run: bool) -> Result<GitDbReport, UploadError>;
}

/// Delivers flushed counters to the metrics collector.
pub trait MetricsTransport {
    fn submit(&self, series: &[Series]) -> Result<(), TransportError>;
}

/// Factory for every remote-facing capability of a run.
///
/// Called only after the API key has been validated as present.
pub trait Backend {
    fn payload_producer(
        &self,
        workdir: &Path,
        repository_url: Option<&RepositoryUrl>,
    ) -> Box<dyn PayloadProducer>;

    fn tracked_files_sender(&self, api_key: &ApiKey) -> Box<dyn PayloadSender>;

    fn gitdb_sync(
        &self,
        api_key: &ApiKey,
        workdir: &Path,
        repository_url: Option<&RepositoryUrl>,
    ) -> Box<dyn GitDbSync>;

    fn metrics_transport(&self, api_key: &ApiKey) -> Box<dyn MetricsTransport>;
}
