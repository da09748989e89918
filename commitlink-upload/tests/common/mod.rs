//! Shared fixtures for the orchestrator scenarios.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use chrono::DateTime;
use commitlink_core::{ApiKey, CommitHash, CommitPayload, RepositoryUrl, Signature};
use commitlink_git::GitError;
use commitlink_upload::telemetry::Series;
use commitlink_upload::{
    Backend, GitDbReport, GitDbSync, MetricsTransport, PayloadProducer, PayloadSender,
    TransportError, UploadError,
};

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under an INFO-level subscriber; returns its value and the log text.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buf = LogBuffer::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .with_max_level(tracing::Level::INFO)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
    (result, logs)
}

// ---------------------------------------------------------------------------
// Fake backend
// ---------------------------------------------------------------------------

/// How each fake capability behaves, and what it saw.
#[derive(Default)]
pub struct Script {
    pub produce_fails: bool,
    /// Sends that fail before one succeeds. `u32::MAX` means never succeed.
    pub send_failures: u32,
    pub gitdb_fails: bool,
    pub flush_fails: bool,

    pub produced: Cell<u32>,
    pub sends: Cell<u32>,
    pub syncs: Cell<u32>,
    pub flushes: Cell<u32>,
    pub flushed: RefCell<Vec<Series>>,
    pub capabilities_built: Cell<u32>,
}

impl Script {
    /// Flushed counter values keyed by unprefixed name.
    pub fn flushed_counters(&self) -> Vec<(String, u64)> {
        self.flushed
            .borrow()
            .iter()
            .map(|s| {
                let name = s
                    .metric
                    .strip_prefix(commitlink_upload::telemetry::METRIC_PREFIX)
                    .unwrap_or(&s.metric)
                    .to_string();
                (name, s.points[0].1)
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    pub script: Rc<Script>,
}

impl FakeBackend {
    pub fn new(script: Script) -> Self {
        Self {
            script: Rc::new(script),
        }
    }
}

pub fn payload() -> CommitPayload {
    let sig = Signature {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        date: DateTime::parse_from_rfc3339("2024-05-01T10:00:00+02:00").unwrap(),
    };
    CommitPayload {
        repository_url: RepositoryUrl::from("https://github.com/org/repo.git"),
        hash: CommitHash::from("0123456789abcdef0123456789abcdef01234567"),
        branch: Some("main".into()),
        author: sig.clone(),
        committer: sig,
        message: "init".into(),
        tracked_files: vec!["src/main.rs".into()],
    }
}

struct FakeProducer(Rc<Script>);

impl PayloadProducer for FakeProducer {
    fn produce(&self) -> Result<CommitPayload, GitError> {
        self.0.produced.set(self.0.produced.get() + 1);
        if self.0.produce_fails {
            return Err(GitError::NoRemote);
        }
        Ok(payload())
    }
}

struct FakeSender(Rc<Script>);

impl PayloadSender for FakeSender {
    fn send(&self, _payload: &CommitPayload, _attempt: u32) -> Result<(), TransportError> {
        let sends = self.0.sends.get() + 1;
        self.0.sends.set(sends);
        if sends > self.0.send_failures {
            Ok(())
        } else {
            Err(TransportError::Status {
                endpoint: "srcmap".into(),
                status: 502,
                body: "bad gateway".into(),
            })
        }
    }
}

struct FakeSync(Rc<Script>);

impl GitDbSync for FakeSync {
    fn sync(&self, _dry_run: bool) -> Result<GitDbReport, UploadError> {
        self.0.syncs.set(self.0.syncs.get() + 1);
        if self.0.gitdb_fails {
            return Err(TransportError::Request {
                endpoint: "search_commits".into(),
                message: "connection refused".into(),
            }
            .into());
        }
        Ok(GitDbReport {
            known: 10,
            uploaded: 2,
            pending: 0,
        })
    }
}

struct FakeMetrics(Rc<Script>);

impl MetricsTransport for FakeMetrics {
    fn submit(&self, series: &[Series]) -> Result<(), TransportError> {
        self.0.flushes.set(self.0.flushes.get() + 1);
        self.0.flushed.borrow_mut().extend_from_slice(series);
        if self.0.flush_fails {
            return Err(TransportError::Status {
                endpoint: "series".into(),
                status: 500,
                body: String::new(),
            });
        }
        Ok(())
    }
}

impl Backend for FakeBackend {
    fn payload_producer(
        &self,
        _workdir: &Path,
        _repository_url: Option<&RepositoryUrl>,
    ) -> Box<dyn PayloadProducer> {
        self.built();
        Box::new(FakeProducer(self.script.clone()))
    }

    fn tracked_files_sender(&self, _api_key: &ApiKey) -> Box<dyn PayloadSender> {
        self.built();
        Box::new(FakeSender(self.script.clone()))
    }

    fn gitdb_sync(
        &self,
        _api_key: &ApiKey,
        _workdir: &Path,
        _repository_url: Option<&RepositoryUrl>,
    ) -> Box<dyn GitDbSync> {
        self.built();
        Box::new(FakeSync(self.script.clone()))
    }

    fn metrics_transport(&self, _api_key: &ApiKey) -> Box<dyn MetricsTransport> {
        self.built();
        Box::new(FakeMetrics(self.script.clone()))
    }
}

impl FakeBackend {
    fn built(&self) {
        let built = &self.script.capabilities_built;
        built.set(built.get() + 1);
    }
}
