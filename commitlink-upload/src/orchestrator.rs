//! Run sequencing for `git-metadata upload`.
//!
//! 1. Enter the working directory (fatal on failure).
//! 2. Require an API key, then a valid site (fatal, nothing else runs).
//! 3. Warn about the deprecated `--git-sync` flag.
//! 4. Build the remote capabilities.
//! 5. Tracked-file channel; a failure is recorded, not propagated.
//! 6. GitDB channel, unless disabled; advisory only.
//! 7. Flush telemetry; failure is a warning.
//! 8. Exit code from the aggregated outcomes.

use std::path::{Path, PathBuf};
use std::time::Instant;

use commitlink_core::{ChannelOutcome, RunResult, UploadConfig};

use crate::channel::{GitDbChannel, TrackedFilesUpload};
use crate::error::UploadError;
use crate::ports::Backend;
use crate::render;
use crate::retry::RetryPolicy;
use crate::telemetry::Telemetry;

/// Runs both upload channels for one configuration.
pub struct Orchestrator<'a, B: Backend + ?Sized> {
    config: &'a UploadConfig,
    backend: &'a B,
    policy: RetryPolicy,
}

impl<'a, B: Backend + ?Sized> Orchestrator<'a, B> {
    pub fn new(config: &'a UploadConfig, backend: &'a B) -> Self {
        Self {
            config,
            backend,
            policy: RetryPolicy::default(),
        }
    }

    /// Run and map the result to a process exit code.
    ///
    /// A run that cannot start logs exactly one error line.
    pub fn execute(&self) -> u8 {
        match self.run() {
            Ok(result) => result.exit_code(),
            Err(err) => {
                tracing::error!("{}", render::fatal(&err));
                1
            }
        }
    }

    /// Run both channels. `Err` only for failures before any channel starts.
    pub fn run(&self) -> Result<RunResult, UploadError> {
        let started = Instant::now();
        let config = self.config;

        let workdir = enter_directory(config.directory.as_deref())?;
        let api_key = config.validate()?;

        if config.legacy_git_sync {
            tracing::warn!("Option --git-sync is deprecated as it is now the default behavior");
        }
        if config.dry_run {
            tracing::warn!("{}", render::dry_run_warning());
        }

        let mut telemetry = Telemetry::for_version(&config.cli_version);
        let metrics = self.backend.metrics_transport(api_key);
        let sender = self.backend.tracked_files_sender(api_key);
        let gitdb_sync = self
            .backend
            .gitdb_sync(api_key, &workdir, config.repository_url.as_ref());
        let prefix = render::dry_run_prefix(config.dry_run);

        tracing::info!("Uploading list of tracked files...");
        let producer = self
            .backend
            .payload_producer(&workdir, config.repository_url.as_ref());
        let channel = TrackedFilesUpload {
            producer: producer.as_ref(),
            sender: sender.as_ref(),
            policy: self.policy,
            dry_run: config.dry_run,
        };
        let (result, secs) = timed(|| channel.run(&mut telemetry));
        let tracked_files = match result {
            Ok(()) => {
                tracing::info!("{prefix}Successfully uploaded tracked files in {secs:.3} seconds.");
                ChannelOutcome::Success
            }
            Err(err) => {
                tracing::debug!("tracked-file upload failed: {err}");
                ChannelOutcome::Failed
            }
        };

        let gitdb = if config.gitdb_sync {
            tracing::info!("Syncing GitDB...");
            let channel = GitDbChannel {
                sync: gitdb_sync.as_ref(),
                site: &config.site,
                dry_run: config.dry_run,
            };
            let (outcome, secs) = timed(|| channel.run(&mut telemetry));
            if outcome == ChannelOutcome::Success {
                tracing::info!("{prefix}Successfully synced git DB in {secs:.3} seconds.");
            }
            outcome
        } else {
            ChannelOutcome::Skipped
        };

        if let Err(err) = telemetry.flush(metrics.as_ref()) {
            tracing::warn!("{err}");
        }

        let result = RunResult {
            tracked_files,
            gitdb,
            elapsed: started.elapsed(),
        };
        if !result.is_failure() {
            tracing::info!(
                "{}",
                render::successful_command(result.elapsed.as_secs_f64(), config.dry_run)
            );
        }
        Ok(result)
    }

    /// Override the tracked-file retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Change into `directory` if given and return the effective working directory.
fn enter_directory(directory: Option<&Path>) -> Result<PathBuf, UploadError> {
    if let Some(dir) = directory {
        std::env::set_current_dir(dir).map_err(|source| UploadError::WorkingDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    std::env::current_dir().map_err(|source| UploadError::WorkingDirectory {
        path: directory.map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        source,
    })
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_secs_f64())
}
