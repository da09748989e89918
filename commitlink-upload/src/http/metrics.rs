//! Metrics collector (`POST https://<api_host>/api/v1/series`).

use serde::Serialize;

use commitlink_core::ApiKey;

use crate::error::TransportError;
use crate::http::{check, API_KEY_HEADER};
use crate::ports::MetricsTransport;
use crate::telemetry::Series;

#[derive(Serialize)]
struct SeriesRequest<'a> {
    series: &'a [Series],
}

pub struct HttpMetricsTransport {
    agent: ureq::Agent,
    url: String,
    api_key: ApiKey,
}

impl HttpMetricsTransport {
    pub fn new(agent: ureq::Agent, api_base: &str, api_key: ApiKey) -> Self {
        Self {
            agent,
            url: format!("{api_base}/api/v1/series"),
            api_key,
        }
    }
}

impl MetricsTransport for HttpMetricsTransport {
    fn submit(&self, series: &[Series]) -> Result<(), TransportError> {
        let result = self
            .agent
            .post(&self.url)
            .set(API_KEY_HEADER, self.api_key.expose())
            .send_json(SeriesRequest { series });
        check(&self.url, result).map(|_| ())
    }
}
