//! The two upload channels.
//!
//! - [`tracked_files`]: required; its failure fails the run.
//! - [`gitdb`]: advisory; failures are downgraded to warnings.

pub mod gitdb;
pub mod tracked_files;

pub use gitdb::GitDbChannel;
pub use tracked_files::TrackedFilesUpload;
