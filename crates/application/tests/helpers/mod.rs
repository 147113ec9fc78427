#![allow(dead_code)]

use async_trait::async_trait;
use gatewatch_application::ports::{Clock, GatewayLogPort};
use gatewatch_domain::{DomainError, LogRecord, Segment};
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const NOW_MS: i64 = 1_700_000_000_000;
pub const NOW_SECS: i64 = NOW_MS / 1000;

/// Deterministic clock; tests advance it explicitly.
pub struct FakeClock {
    ms: AtomicI64,
}

impl FakeClock {
    pub fn at(ms: i64) -> Arc<Self> {
        Arc::new(Self {
            ms: AtomicI64::new(ms),
        })
    }

    pub fn advance_ms(&self, delta: i64) {
        self.ms.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> i64 {
        self.ms.load(Ordering::SeqCst)
    }
}

type Responder =
    dyn Fn(Segment, u32) -> Result<Vec<LogRecord>, DomainError> + Send + Sync + 'static;

/// Scripted upstream: a responder closure decides each segment's outcome,
/// every call is recorded, and an optional delay makes cancellation
/// observable.
pub struct MockGatewayPort {
    responder: Box<Responder>,
    calls: Mutex<Vec<Segment>>,
    delay: Option<Duration>,
}

impl MockGatewayPort {
    pub fn new(
        responder: impl Fn(Segment, u32) -> Result<Vec<LogRecord>, DomainError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Upstream that always succeeds with the given batch per segment.
    pub fn returning(batch: Vec<LogRecord>) -> Self {
        Self::new(move |_, _| Ok(batch.clone()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Segment> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GatewayLogPort for MockGatewayPort {
    async fn fetch_logs(
        &self,
        segment: Segment,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogRecord>, DomainError> {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        self.calls.lock().unwrap().push(segment);
        if let Some(delay) = self.delay {
            tokio::select! {
                _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
        (self.responder)(segment, limit)
    }
}

pub fn blocked(domain: &str) -> LogRecord {
    LogRecord(json!({"action": "dns_block", "query": domain, "timestamp": NOW_SECS}))
}

pub fn allowed(domain: &str) -> LogRecord {
    LogRecord(json!({"action": "allow", "query": domain, "timestamp": NOW_SECS}))
}

pub fn log_at_secs(ts: i64) -> LogRecord {
    LogRecord(json!({"action": "allow", "query": "x.test", "timestamp": ts}))
}

pub fn timeout_error() -> DomainError {
    DomainError::UpstreamTimeout
}

pub fn server_error() -> DomainError {
    DomainError::UpstreamStatus {
        status: 500,
        body: "internal error".to_string(),
    }
}
