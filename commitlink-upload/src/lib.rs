//! # commitlink-upload
//!
//! Upload orchestration for `commitlink git-metadata upload`.
//!
//! [`Orchestrator`] runs the tracked-file channel and the GitDB channel in
//! sequence, aggregates their outcomes and flushes run telemetry. The remote
//! side is reached only through the traits in [`ports`]; [`http`] provides
//! the production implementations.

pub mod channel;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod ports;
pub mod render;
pub mod retry;
pub mod source;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use error::{FlushError, TransportError, UploadError};
pub use http::HttpBackend;
pub use orchestrator::Orchestrator;
pub use ports::{Backend, GitDbReport, GitDbSync, MetricsTransport, PayloadProducer, PayloadSender};
pub use retry::{RetryAttempt, RetryListener, RetryPolicy, Retryable};
pub use source::WorkTreeSource;
pub use telemetry::Telemetry;
