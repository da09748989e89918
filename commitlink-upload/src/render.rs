//! Human-readable messages for the upload command.

use colored::Colorize;

use commitlink_core::CommitPayload;

use crate::error::{TransportError, UploadError};

pub const ICON_SUCCESS: &str = "✅";
pub const ICON_FAILED: &str = "❌";
pub const ICON_WARNING: &str = "⚠️ ";

pub const GOV_GITDB_UNAVAILABLE: &str = "Not writing to GitDB: not available for gov";

/// Prefix that marks output of a run that writes nothing.
pub fn dry_run_prefix(dry_run: bool) -> &'static str {
    if dry_run {
        "[DRYRUN] "
    } else {
        ""
    }
}

pub fn dry_run_warning() -> String {
    format!("{ICON_WARNING}DRY-RUN MODE ENABLED. WILL NOT UPLOAD TRACKED FILES")
        .yellow()
        .to_string()
}

pub fn commit_info(payload: &CommitPayload) -> String {
    let branch = payload.branch.as_deref().unwrap_or("(detached)");
    format!(
        "Reporting commit {} on {} from repository {} ({} tracked files)",
        payload.hash.short(),
        branch,
        payload.repository_url,
        payload.tracked_files.len()
    )
}

pub fn failed_upload(message: &dyn std::fmt::Display) -> String {
    format!("{ICON_FAILED} Failed upload: {message}")
        .red()
        .to_string()
}

pub fn retried_upload(error: &TransportError, attempt: u32) -> String {
    format!("[attempt {attempt}] Retrying upload: {error}")
        .yellow()
        .to_string()
}

/// The single error line printed for a run that could not start.
pub fn fatal(error: &UploadError) -> String {
    let line = match error {
        UploadError::Configuration(inner) => {
            format!("{ICON_FAILED} Invalid configuration: {inner}")
        }
        other => format!("{ICON_FAILED} {other}"),
    };
    line.red().to_string()
}

pub fn successful_command(elapsed_secs: f64, dry_run: bool) -> String {
    format!(
        "{ICON_SUCCESS} {}Handled in {elapsed_secs:.3} seconds.",
        dry_run_prefix(dry_run)
    )
    .green()
    .to_string()
}
