//! # commitlink-git
//!
//! Reads commit metadata from a git working tree by invoking the `git` binary.
//!
//! Open a [`GitRepository`] and call [`GitRepository::commit_payload`] for the
//! tracked-file upload, or [`GitRepository::recent_commits`] for GitDB sync.

pub mod error;
pub mod repository;

pub use error::GitError;
pub use repository::GitRepository;
