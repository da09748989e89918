//! GitDB sync channel. One attempt, never fatal.

use commitlink_core::{ChannelOutcome, Site};

use crate::ports::GitDbSync;
use crate::render;
use crate::telemetry::{Telemetry, GITDB_SUCCESS};

pub struct GitDbChannel<'a> {
    pub sync: &'a dyn GitDbSync,
    pub site: &'a Site,
    /// Passed through; the sync decides what a dry run skips.
    pub dry_run: bool,
}

impl GitDbChannel<'_> {
    pub fn run(&self, telemetry: &mut Telemetry) -> ChannelOutcome {
        match self.sync.sync(self.dry_run) {
            Ok(report) => {
                tracing::debug!(
                    known = report.known,
                    uploaded = report.uploaded,
                    pending = report.pending,
                    "GitDB sync finished"
                );
                telemetry.increment(GITDB_SUCCESS, 1);
                ChannelOutcome::Success
            }
            Err(err) => {
                if self.site.is_gov() {
                    tracing::warn!("{}", render::GOV_GITDB_UNAVAILABLE);
                } else {
                    tracing::warn!("Could not write to GitDB: {err}");
                }
                ChannelOutcome::Failed
            }
        }
    }
}
