use gatewatch_application::ports::{ArtifactStore, Clock, SummaryArtifact};
use gatewatch_application::services::SummaryCache;
use gatewatch_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const DEFAULT_INTERVAL_SECS: u64 = 21_600;
const DEFAULT_RANGE_KEY: &str = "7d";

/// Background job that periodically persists a summary snapshot to disk.
///
/// Each cycle serves the configured range through the cache (so a fresh
/// entry costs nothing) and writes the summary plus a bounded blocked-record
/// sample as JSON artifacts. The first cycle runs at startup.
pub struct SnapshotJob {
    cache: SummaryCache,
    store: Arc<dyn ArtifactStore>,
    clock: Arc<dyn Clock>,
    range_key: String,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl SnapshotJob {
    pub fn new(cache: SummaryCache, store: Arc<dyn ArtifactStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache,
            store,
            clock,
            range_key: DEFAULT_RANGE_KEY.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_range(mut self, range_key: impl Into<String>) -> Self {
        self.range_key = range_key.into();
        self
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            range = %self.range_key,
            interval_secs = self.interval_secs,
            "Starting snapshot job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("SnapshotJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.run_once().await {
                            Ok(()) => info!(range = %self.range_key, "Snapshot cycle completed"),
                            Err(e) => error!(error = %e, "Snapshot cycle failed"),
                        }
                    }
                }
            }
        });
    }

    /// One snapshot cycle. Also used directly by the one-shot batch mode.
    pub async fn run_once(&self) -> Result<(), DomainError> {
        let view = self.cache.get(&self.range_key, false).await?;
        let value = view.value;

        let artifact = SummaryArtifact {
            range_key: value.effective_range_key.clone(),
            range_label: value.effective_range_label.clone(),
            generated_at_ms: self.clock.now_ms(),
            log_count: value.log_count,
            summary: value.summary.clone(),
            trace: value.trace.clone(),
        };

        self.store.persist(&artifact, &value.blocked_sample).await
    }
}
