//! Tracked-file upload channel.
//!
//! `produce payload → (dry run: done | live: send under the retry policy)`.
//! Only the send is retried; a payload that cannot be produced fails the
//! channel immediately.

use commitlink_core::CommitPayload;

use crate::error::{TransportError, UploadError};
use crate::ports::{PayloadProducer, PayloadSender};
use crate::render;
use crate::retry::{RetryAttempt, RetryListener, RetryPolicy};
use crate::telemetry::{Telemetry, SCI_FAILED, SCI_RETRIES, SCI_SUCCESS};

/// One execution of the tracked-file channel.
pub struct TrackedFilesUpload<'a> {
    pub producer: &'a dyn PayloadProducer,
    pub sender: &'a dyn PayloadSender,
    pub policy: RetryPolicy,
    pub dry_run: bool,
}

impl TrackedFilesUpload<'_> {
    /// Produce and deliver the payload.
    ///
    /// Every failure path logs exactly one error line before returning `Err`.
    pub fn run(&self, telemetry: &mut Telemetry) -> Result<(), UploadError> {
        let payload = match self.producer.produce() {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!("{}", render::failed_upload(&err));
                return Err(err.into());
            }
        };
        tracing::info!("{}", render::commit_info(&payload));

        if self.dry_run {
            tracing::debug!(
                "[DRYRUN] skipping upload of {} tracked files",
                payload.tracked_files.len()
            );
        } else {
            self.send(&payload, telemetry)?;
        }

        telemetry.increment(SCI_SUCCESS, 1);
        Ok(())
    }

    fn send(&self, payload: &CommitPayload, telemetry: &mut Telemetry) -> Result<(), TransportError> {
        let mut listener = UploadListener { telemetry };
        self.policy
            .execute(|attempt| self.sender.send(payload, attempt), &mut listener)
    }
}

/// Logs and counts retry transitions.
struct UploadListener<'t> {
    telemetry: &'t mut Telemetry,
}

impl RetryListener<TransportError> for UploadListener<'_> {
    fn on_retry(&mut self, attempt: RetryAttempt<'_, TransportError>) {
        tracing::warn!("{}", render::retried_upload(attempt.error, attempt.number));
        self.telemetry.increment(SCI_RETRIES, 1);
    }

    fn on_exhausted(&mut self, error: &TransportError, attempts: u32) {
        tracing::error!(
            "{} (gave up after {attempts} attempt(s))",
            render::failed_upload(error)
        );
        self.telemetry.increment(SCI_FAILED, 1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
