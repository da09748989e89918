//! Error types for commitlink-upload.

use std::path::PathBuf;

use thiserror::Error;

use commitlink_core::ConfigError;
use commitlink_git::GitError;

use crate::retry::Retryable;

/// Errors that end a run or a channel.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Missing or invalid configuration. Nothing has been sent.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// The `--directory` override could not be entered.
    #[error("cannot use directory {path}: {source}")]
    WorkingDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Commit metadata could not be derived from the working tree.
    #[error("could not read git metadata: {0}")]
    Retrieval(#[from] GitError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A remote call that did not complete successfully.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS or timeout failure; no HTTP status was received.
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("{endpoint} responded with HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body was not what the endpoint documents.
    #[error("unreadable response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// The service rejected the API key and key validation confirmed it.
    #[error("the API key was rejected by {endpoint}; check COMMITLINK_API_KEY")]
    InvalidCredential { endpoint: String },
}

impl Retryable for TransportError {
    fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::InvalidCredential { .. })
    }
}

/// Telemetry could not be delivered. Never fatal.
#[derive(Debug, Error)]
#[error("failed to flush metrics: {0}")]
pub struct FlushError(#[from] pub TransportError);
