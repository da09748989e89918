//! Run configuration.
//!
//! [`UploadConfig`] is assembled once by the CLI (flags + environment) and is
//! read-only for the rest of the run.

use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::RepositoryUrl;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "COMMITLINK_API_KEY";

/// Site used when `COMMITLINK_SITE` is unset.
pub const DEFAULT_SITE: &str = "commitlink.io";

/// The government deployment. It does not offer GitDB sync.
pub const GOV_SITE: &str = "gov.commitlink.io";

// ---------------------------------------------------------------------------
// ApiKey
// ---------------------------------------------------------------------------

/// API credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for a missing or blank value.
    pub fn from_env_value(raw: Option<String>) -> Option<Self> {
        raw.map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .map(Self)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// ---------------------------------------------------------------------------
// Site / Endpoints
// ---------------------------------------------------------------------------

/// Deployment site of the remote service, e.g. `commitlink.io`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site(String);

impl Site {
    /// Normalise without validating; see [`Site::validate`].
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let site = Self::new(raw);
        site.validate()?;
        Ok(site)
    }

    /// A site must be a bare hostname.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid {
            return Err(ConfigError::InvalidSite {
                site: self.0.clone(),
            });
        }
        Ok(())
    }

    pub fn is_gov(&self) -> bool {
        self.0 == GOV_SITE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Site {
    fn default() -> Self {
        Self(DEFAULT_SITE.to_owned())
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Base addresses of the two remote surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Host (or full base URL) of the general API: GitDB, key validation, metrics.
    pub api_host: String,
    /// Base URL of the tracked-file intake.
    pub intake_url: String,
}

impl Endpoints {
    /// Derive endpoints from the site, honouring explicit overrides.
    pub fn resolve(site: &Site, api_host: Option<String>, intake_url: Option<String>) -> Self {
        let api_host = api_host
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| format!("api.{site}"));
        let intake_url = intake_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| format!("https://sourcemap-intake.{site}"));
        Self {
            api_host,
            intake_url,
        }
    }

    /// `https://<api_host>`, unless the host already carries a scheme.
    pub fn api_base(&self) -> String {
        if self.api_host.contains("://") {
            self.api_host.trim_end_matches('/').to_owned()
        } else {
            format!("https://{}", self.api_host.trim_end_matches('/'))
        }
    }

    /// Full URL the tracked-file payload is posted to.
    pub fn srcmap_url(&self) -> String {
        format!("{}/api/v2/srcmap", self.intake_url.trim_end_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// UploadConfig
// ---------------------------------------------------------------------------

/// Immutable configuration for one `git-metadata upload` run.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub api_key: Option<ApiKey>,
    pub site: Site,
    pub endpoints: Endpoints,
    pub dry_run: bool,
    /// Whether the GitDB channel runs. On by default.
    pub gitdb_sync: bool,
    /// The deprecated `--git-sync` flag was passed. Has no effect beyond a warning.
    pub legacy_git_sync: bool,
    pub repository_url: Option<RepositoryUrl>,
    pub directory: Option<PathBuf>,
    /// Version reported in request headers and telemetry tags.
    pub cli_version: String,
}

impl UploadConfig {
    /// The credential, or the configuration error reported when it is absent.
    pub fn require_api_key(&self) -> Result<&ApiKey, ConfigError> {
        self.api_key
            .as_ref()
            .ok_or(ConfigError::MissingApiKey { var: API_KEY_ENV })
    }

    /// Check the credential, then the site. Returns the credential.
    pub fn validate(&self) -> Result<&ApiKey, ConfigError> {
        let api_key = self.require_api_key()?;
        self.site.validate()?;
        Ok(api_key)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        let site = Site::default();
        let endpoints = Endpoints::resolve(&site, None, None);
        Self {
            api_key: None,
            site,
            endpoints,
            dry_run: false,
            gitdb_sync: true,
            legacy_git_sync: false,
            repository_url: None,
            directory: None,
            cli_version: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
