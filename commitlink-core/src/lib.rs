//! commitlink core library: domain types, run configuration, errors.
//!
//! - [`types`]: payloads, newtypes and run outcomes
//! - [`config`]: [`UploadConfig`] and the values it is assembled from
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{ApiKey, Endpoints, Site, UploadConfig, API_KEY_ENV};
pub use error::ConfigError;
pub use types::{
    ChannelOutcome, CommitHash, CommitPayload, CommitRecord, RepositoryUrl, RunResult, Signature,
};
