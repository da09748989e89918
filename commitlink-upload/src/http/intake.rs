//! Tracked-file intake (`POST <intake>/api/v2/srcmap`).

use std::rc::Rc;

use serde::Serialize;

use commitlink_core::{ApiKey, CommitPayload};

use crate::error::TransportError;
use crate::http::{
    check, Backoff, ApiKeyValidator, API_KEY_HEADER, ORIGIN, ORIGIN_HEADER, ORIGIN_VERSION_HEADER,
};
use crate::ports::PayloadSender;

#[derive(Serialize)]
struct SrcmapRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    cli_version: &'a str,
    repository: RepositoryDocument<'a>,
}

#[derive(Serialize)]
struct RepositoryDocument<'a> {
    version: u8,
    data: Vec<RepositoryEntry<'a>>,
}

#[derive(Serialize)]
struct RepositoryEntry<'a> {
    hash: &'a str,
    repository_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    files: &'a [String],
}

fn request_body<'a>(payload: &'a CommitPayload, cli_version: &'a str) -> SrcmapRequest<'a> {
    SrcmapRequest {
        kind: "repository",
        cli_version,
        repository: RepositoryDocument {
            version: 1,
            data: vec![RepositoryEntry {
                hash: payload.hash.as_str(),
                repository_url: payload.repository_url.as_str(),
                branch: payload.branch.as_deref(),
                files: &payload.tracked_files,
            }],
        },
    }
}

/// Posts the tracked-file payload to the intake.
pub struct HttpPayloadSender {
    agent: ureq::Agent,
    url: String,
    api_key: ApiKey,
    cli_version: String,
    backoff: Backoff,
    validator: Rc<ApiKeyValidator>,
}

impl HttpPayloadSender {
    pub fn new(
        agent: ureq::Agent,
        url: String,
        api_key: ApiKey,
        cli_version: String,
        backoff: Backoff,
        validator: Rc<ApiKeyValidator>,
    ) -> Self {
        Self {
            agent,
            url,
            api_key,
            cli_version,
            backoff,
            validator,
        }
    }
}

impl PayloadSender for HttpPayloadSender {
    fn send(&self, payload: &CommitPayload, attempt: u32) -> Result<(), TransportError> {
        self.backoff.wait(attempt);
        tracing::debug!(
            "POST {} ({} files, attempt {attempt})",
            self.url,
            payload.tracked_files.len()
        );

        let result = self
            .agent
            .post(&self.url)
            .set(API_KEY_HEADER, self.api_key.expose())
            .set(ORIGIN_HEADER, ORIGIN)
            .set(ORIGIN_VERSION_HEADER, &self.cli_version)
            .send_json(request_body(payload, &self.cli_version));

        match check(&self.url, result) {
            Ok(_) => Ok(()),
            Err(err @ TransportError::Status { status: 403, .. }) => {
                if matches!(self.validator.is_valid(), Ok(false)) {
                    return Err(TransportError::InvalidCredential {
                        endpoint: self.url.clone(),
                    });
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
