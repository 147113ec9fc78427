use gatewatch_application::ports::{ArtifactStore, GatewayLogPort};
use gatewatch_application::services::cache::CacheSettings;
use gatewatch_application::services::SummaryCache;
use gatewatch_jobs::{JobRunner, PrefetchJob, SnapshotJob};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::{FakeClock, MockArtifactStore, ScriptedGatewayPort, NOW_MS};

#[tokio::test]
async fn empty_runner_starts_without_panic() {
    JobRunner::new().start().await;
}

#[tokio::test]
async fn runner_spawns_configured_jobs_under_one_shutdown_token() {
    let port = Arc::new(ScriptedGatewayPort::bounded_only());
    let cache = SummaryCache::new(
        port as Arc<dyn GatewayLogPort>,
        FakeClock::at(NOW_MS),
        CacheSettings::default(),
    );
    let (tx, rx) = mpsc::channel(8);
    cache.set_served_notifier(tx);
    let store = Arc::new(MockArtifactStore::new());
    let shutdown = CancellationToken::new();

    JobRunner::new()
        .with_prefetch(PrefetchJob::new(cache.clone(), rx))
        .with_snapshot(SnapshotJob::new(
            cache.clone(),
            store.clone() as Arc<dyn ArtifactStore>,
            FakeClock::at(NOW_MS),
        ))
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    sleep(Duration::from_millis(100)).await;
    assert!(store.persist_count() >= 1);

    shutdown.cancel();
}
