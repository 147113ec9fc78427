use anyhow::bail;
use gatewatch_api::AppState;
use gatewatch_application::ports::{ArtifactStore, Clock, GatewayLogPort, SystemClock};
use gatewatch_application::services::cache::CacheSettings;
use gatewatch_application::services::SummaryCache;
use gatewatch_application::use_cases::GetActivitySummaryUseCase;
use gatewatch_domain::Config;
use gatewatch_infrastructure::{GatewayLogClient, JsonArtifactStore};
use gatewatch_jobs::{JobRunner, PrefetchJob, SnapshotJob};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const SERVED_CHANNEL_CAPACITY: usize = 8;

/// Wired dependencies. The cache is absent when upstream credentials are
/// missing; the server still starts and the API explains the problem.
pub struct Services {
    cache: Option<SummaryCache>,
    config_error: Option<String>,
    clock: Arc<dyn Clock>,
}

impl Services {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let credentials = match config.upstream.credentials() {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!(error = %e, "Upstream credentials not configured");
                return Ok(Self {
                    cache: None,
                    config_error: Some(e.to_string()),
                    clock,
                });
            }
        };

        let client = GatewayLogClient::new(&config.upstream, &credentials)?;
        let settings = CacheSettings {
            ttl_ms: config.cache.ttl_ms,
            top_n: config.cache.top_n,
            page_limit: config.upstream.page_limit,
            blocked_sample_cap: config.cache.blocked_sample_cap,
        };
        let cache = SummaryCache::new(
            Arc::new(client) as Arc<dyn GatewayLogPort>,
            Arc::clone(&clock),
            settings,
        );

        Ok(Self {
            cache: Some(cache),
            config_error: None,
            clock,
        })
    }

    pub fn app_state(&self) -> AppState {
        match &self.cache {
            Some(cache) => {
                AppState::ready(Arc::new(GetActivitySummaryUseCase::new(cache.clone())))
            }
            None => AppState::unconfigured(
                self.config_error
                    .clone()
                    .unwrap_or_else(|| "upstream credentials not configured".to_string()),
            ),
        }
    }

    pub async fn start_jobs(&self, config: &Config, shutdown: CancellationToken) {
        let Some(cache) = &self.cache else {
            return;
        };

        let mut runner = JobRunner::new().with_shutdown_token(shutdown);

        if config.cache.prefetch {
            let (tx, rx) = mpsc::channel(SERVED_CHANNEL_CAPACITY);
            cache.set_served_notifier(tx);
            runner = runner.with_prefetch(PrefetchJob::new(cache.clone(), rx));
        }

        if let Some(dir) = &config.cache.snapshot_dir {
            let store: Arc<dyn ArtifactStore> = Arc::new(JsonArtifactStore::new(dir));
            runner = runner.with_snapshot(
                SnapshotJob::new(cache.clone(), store, Arc::clone(&self.clock))
                    .with_range(config.cache.snapshot_range.clone())
                    .with_interval(config.cache.snapshot_interval_secs),
            );
        }

        runner.start().await;
    }

    /// Batch mode: one snapshot cycle, then exit.
    pub async fn snapshot_once(&self, config: &Config, range: &str) -> anyhow::Result<()> {
        let Some(cache) = &self.cache else {
            bail!(
                "{}",
                self.config_error
                    .clone()
                    .unwrap_or_else(|| "upstream credentials not configured".to_string())
            );
        };

        let dir = config
            .cache
            .snapshot_dir
            .clone()
            .unwrap_or_else(|| "snapshots".to_string());
        let store: Arc<dyn ArtifactStore> = Arc::new(JsonArtifactStore::new(&dir));
        let job = SnapshotJob::new(cache.clone(), store, Arc::clone(&self.clock)).with_range(range);
        job.run_once().await?;

        info!(dir = %dir, range, "Snapshot written");
        Ok(())
    }
}
