//! Error types for commitlink-core.

use thiserror::Error;

/// Problems with the run configuration, detected before any channel runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No API credential was supplied (unset or empty).
    #[error("Missing {var} in your environment")]
    MissingApiKey { var: &'static str },

    /// The deployment site is empty or contains characters a hostname cannot.
    #[error("invalid site '{site}': expected a bare hostname such as commitlink.io")]
    InvalidSite { site: String },
}
