//! `commitlink git-metadata upload`: report HEAD's tracked files and sync
//! recent history to GitDB.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use commitlink_core::config::DEFAULT_SITE;
use commitlink_core::{ApiKey, Endpoints, RepositoryUrl, Site, UploadConfig, API_KEY_ENV};
use commitlink_upload::{HttpBackend, Orchestrator};

/// Arguments for `commitlink git-metadata upload`.
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Compute everything but send no tracked files.
    #[arg(long)]
    pub dry_run: bool,

    /// Log request details and debug output.
    #[arg(long)]
    pub verbose: bool,

    /// Deprecated: GitDB sync is now on by default.
    #[arg(long, hide = true)]
    pub git_sync: bool,

    /// Skip the GitDB sync.
    #[arg(long = "no-gitsync")]
    pub no_gitsync: bool,

    /// Run from this directory instead of the current one.
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Report this repository URL instead of the one from the git remote.
    #[arg(long)]
    pub repository_url: Option<String>,

    /// Site of the commitlink service.
    #[arg(long, env = "COMMITLINK_SITE", default_value = DEFAULT_SITE, hide = true)]
    pub site: String,

    #[arg(long, env = "COMMITLINK_API_HOST", hide = true)]
    pub api_host: Option<String>,

    #[arg(long, env = "COMMITLINK_INTAKE_URL", hide = true)]
    pub intake_url: Option<String>,
}

impl UploadArgs {
    pub fn run(self) -> Result<ExitCode> {
        crate::init_tracing(self.verbose);

        let config = self.into_config(std::env::var(API_KEY_ENV).ok());
        tracing::debug!(site = %config.site, api = %config.endpoints.api_base(), "resolved endpoints");

        let backend = HttpBackend::new(config.endpoints.clone(), config.cli_version.clone());
        let code = Orchestrator::new(&config, &backend).execute();
        Ok(ExitCode::from(code))
    }

    /// The site is validated by the orchestrator, after the credential.
    fn into_config(self, api_key: Option<String>) -> UploadConfig {
        let site = Site::new(&self.site);
        let endpoints = Endpoints::resolve(&site, self.api_host, self.intake_url);
        UploadConfig {
            api_key: ApiKey::from_env_value(api_key),
            site,
            endpoints,
            dry_run: self.dry_run,
            gitdb_sync: !self.no_gitsync,
            legacy_git_sync: self.git_sync,
            repository_url: self
                .repository_url
                .as_deref()
                .map(RepositoryUrl::without_credentials),
            directory: self.directory,
            cli_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
