//! HTTP implementations of the [`crate::ports`] capabilities (blocking, `ureq`).

pub mod backoff;
pub mod gitdb;
pub mod intake;
pub mod metrics;
pub mod validator;

use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use commitlink_core::{ApiKey, Endpoints, RepositoryUrl};

use crate::error::TransportError;
use crate::ports::{Backend, GitDbSync, MetricsTransport, PayloadProducer, PayloadSender};
use crate::source::WorkTreeSource;

pub use backoff::Backoff;
pub use gitdb::HttpGitDb;
pub use intake::HttpPayloadSender;
pub use metrics::HttpMetricsTransport;
pub use validator::ApiKeyValidator;

pub const API_KEY_HEADER: &str = "commitlink-api-key";
pub const ORIGIN_HEADER: &str = "commitlink-origin";
pub const ORIGIN_VERSION_HEADER: &str = "commitlink-origin-version";
pub const ORIGIN: &str = "commitlink git-metadata";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Response bodies in error messages are cut to this many characters.
const MAX_ERROR_BODY: usize = 512;

/// Production [`Backend`]: git working tree + HTTPS endpoints.
#[derive(Clone)]
pub struct HttpBackend {
    agent: ureq::Agent,
    endpoints: Endpoints,
    cli_version: String,
    backoff: Backoff,
}

impl HttpBackend {
    pub fn new(endpoints: Endpoints, cli_version: impl Into<String>) -> Self {
        Self {
            agent: build_agent(),
            endpoints,
            cli_version: cli_version.into(),
            backoff: Backoff::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }
}

impl Backend for HttpBackend {
    fn payload_producer(
        &self,
        workdir: &Path,
        repository_url: Option<&RepositoryUrl>,
    ) -> Box<dyn PayloadProducer> {
        Box::new(WorkTreeSource::new(workdir, repository_url.cloned()))
    }

    fn tracked_files_sender(&self, api_key: &ApiKey) -> Box<dyn PayloadSender> {
        let validator = Rc::new(ApiKeyValidator::new(
            self.agent.clone(),
            &self.endpoints.api_base(),
            api_key.clone(),
        ));
        Box::new(HttpPayloadSender::new(
            self.agent.clone(),
            self.endpoints.srcmap_url(),
            api_key.clone(),
            self.cli_version.clone(),
            self.backoff,
            validator,
        ))
    }

    fn gitdb_sync(
        &self,
        api_key: &ApiKey,
        workdir: &Path,
        repository_url: Option<&RepositoryUrl>,
    ) -> Box<dyn GitDbSync> {
        Box::new(HttpGitDb::new(
            self.agent.clone(),
            &self.endpoints.api_base(),
            api_key.clone(),
            WorkTreeSource::new(workdir, repository_url.cloned()),
        ))
    }

    fn metrics_transport(&self, api_key: &ApiKey) -> Box<dyn MetricsTransport> {
        Box::new(HttpMetricsTransport::new(
            self.agent.clone(),
            &self.endpoints.api_base(),
            api_key.clone(),
        ))
    }
}

pub(crate) fn build_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Map a `ureq` result onto [`TransportError`], keeping the endpoint for context.
pub(crate) fn check(
    endpoint: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> Result<ureq::Response, TransportError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, response)) => {
            let mut body = response.into_string().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
                body.push('…');
            }
            Err(TransportError::Status {
                endpoint: endpoint.to_owned(),
                status,
                body,
            })
        }
        Err(ureq::Error::Transport(transport)) => Err(TransportError::Request {
            endpoint: endpoint.to_owned(),
            message: transport.to_string(),
        }),
    }
}

/// Deserialize a JSON response body.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    response: ureq::Response,
) -> Result<T, TransportError> {
    response.into_json().map_err(|e| TransportError::Decode {
        endpoint: endpoint.to_owned(),
        message: e.to_string(),
    })
}
