//! Lazy API key validation.
//!
//! Senders consult the validator only after the service answered 403, to
//! tell a rejected key apart from other authorization failures.

use std::cell::OnceCell;

use commitlink_core::ApiKey;

use crate::error::TransportError;
use crate::http::{check, API_KEY_HEADER};

pub struct ApiKeyValidator {
    agent: ureq::Agent,
    url: String,
    api_key: ApiKey,
    verdict: OnceCell<bool>,
}

impl ApiKeyValidator {
    pub fn new(agent: ureq::Agent, api_base: &str, api_key: ApiKey) -> Self {
        Self {
            agent,
            url: format!("{api_base}/api/v1/validate"),
            api_key,
            verdict: OnceCell::new(),
        }
    }

    /// Whether the key is accepted. The first successful answer is cached.
    pub fn is_valid(&self) -> Result<bool, TransportError> {
        if let Some(valid) = self.verdict.get() {
            return Ok(*valid);
        }
        let result = self
            .agent
            .get(&self.url)
            .set(API_KEY_HEADER, self.api_key.expose())
            .call();
        let valid = match check(&self.url, result) {
            Ok(_) => true,
            Err(TransportError::Status {
                status: 401 | 403, ..
            }) => false,
            Err(other) => return Err(other),
        };
        if !valid {
            tracing::debug!("API key rejected by {}", self.url);
        }
        let _ = self.verdict.set(valid);
        Ok(valid)
    }
}
