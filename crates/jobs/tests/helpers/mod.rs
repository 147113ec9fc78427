#![allow(dead_code)]

use async_trait::async_trait;
use gatewatch_application::ports::{ArtifactStore, Clock, GatewayLogPort, SummaryArtifact};
use gatewatch_domain::{DomainError, LogRecord, Segment};
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

pub const NOW_MS: i64 = 1_700_000_000_000;
pub const NOW_SECS: i64 = NOW_MS / 1000;

pub struct FakeClock {
    ms: AtomicI64,
}

impl FakeClock {
    pub fn at(ms: i64) -> Arc<Self> {
        Arc::new(Self {
            ms: AtomicI64::new(ms),
        })
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> i64 {
        self.ms.load(Ordering::SeqCst)
    }
}

type Responder = dyn Fn(Segment) -> Result<Vec<LogRecord>, DomainError> + Send + Sync + 'static;

pub struct ScriptedGatewayPort {
    responder: Box<Responder>,
    calls: Mutex<Vec<Segment>>,
}

impl ScriptedGatewayPort {
    pub fn new(
        responder: impl Fn(Segment) -> Result<Vec<LogRecord>, DomainError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// One blocked record per bounded segment, nothing for unbounded ones.
    pub fn bounded_only() -> Self {
        Self::new(|segment| match segment.to {
            Some(to) => Ok(vec![LogRecord(json!({
                "action": "dns_block",
                "query": "ads.example.com",
                "timestamp": to - 60,
            }))]),
            None => Ok(vec![]),
        })
    }

    /// Upstream with no history at all.
    pub fn empty() -> Self {
        Self::new(|_| Ok(vec![]))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GatewayLogPort for ScriptedGatewayPort {
    async fn fetch_logs(
        &self,
        segment: Segment,
        _limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogRecord>, DomainError> {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        self.calls.lock().unwrap().push(segment);
        (self.responder)(segment)
    }
}

#[derive(Default)]
pub struct MockArtifactStore {
    persisted: Mutex<Vec<(SummaryArtifact, usize)>>,
}

impl MockArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persist_count(&self) -> usize {
        self.persisted.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<SummaryArtifact> {
        self.persisted
            .lock()
            .unwrap()
            .last()
            .map(|(artifact, _)| artifact.clone())
    }

    pub fn last_sample_len(&self) -> Option<usize> {
        self.persisted.lock().unwrap().last().map(|(_, len)| *len)
    }
}

#[async_trait]
impl ArtifactStore for MockArtifactStore {
    async fn persist(
        &self,
        artifact: &SummaryArtifact,
        blocked_sample: &[LogRecord],
    ) -> Result<(), DomainError> {
        self.persisted
            .lock()
            .unwrap()
            .push((artifact.clone(), blocked_sample.len()));
        Ok(())
    }
}
