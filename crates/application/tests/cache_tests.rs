use gatewatch_application::ports::GatewayLogPort;
use gatewatch_application::services::cache::CacheSettings;
use gatewatch_application::services::SummaryCache;
use gatewatch_domain::{DomainError, Segment};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod helpers;
use helpers::{blocked, FakeClock, MockGatewayPort, NOW_MS};

const TTL_MS: i64 = 60_000;

fn settings() -> CacheSettings {
    CacheSettings {
        ttl_ms: TTL_MS,
        ..CacheSettings::default()
    }
}

fn cache_with(port: Arc<MockGatewayPort>, clock: Arc<FakeClock>) -> SummaryCache {
    SummaryCache::new(port as Arc<dyn GatewayLogPort>, clock, settings())
}

async fn wait_until_fresh(cache: &SummaryCache, key: &str) {
    for _ in 0..200 {
        if cache.is_fresh(key) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("cache entry for {key} never became fresh");
}

#[tokio::test]
async fn fresh_hit_performs_zero_upstream_calls() {
    let port = Arc::new(MockGatewayPort::returning(vec![blocked("ads.example.com")]));
    let cache = cache_with(port.clone(), FakeClock::at(NOW_MS));

    let first = cache.get("7d", false).await.unwrap();
    let calls_after_first = port.call_count();
    assert!(calls_after_first > 0);
    assert!(!first.from_cache);

    let second = cache.get("7d", false).await.unwrap();
    assert_eq!(port.call_count(), calls_after_first);
    assert!(second.from_cache);
    assert!(!second.stale);
    // Identical snapshot, not a re-aggregation.
    assert!(Arc::ptr_eq(&first.value, &second.value));
}

#[tokio::test]
async fn stale_entry_is_served_immediately_and_refreshed_in_background() {
    let port = Arc::new(MockGatewayPort::returning(vec![blocked("ads.example.com")]));
    let clock = FakeClock::at(NOW_MS);
    let cache = cache_with(port.clone(), clock.clone());

    let first = cache.get("7d", false).await.unwrap();
    let calls_after_first = port.call_count();

    clock.advance_ms(TTL_MS + 1);
    assert!(!cache.is_fresh("7d"));

    let stale = cache.get("7d", false).await.unwrap();
    assert!(stale.from_cache);
    assert!(stale.stale);
    // The stale response is the old snapshot, not blocked on the refresh.
    assert!(Arc::ptr_eq(&first.value, &stale.value));

    wait_until_fresh(&cache, "7d").await;
    assert_eq!(port.call_count(), calls_after_first * 2);

    let refreshed = cache.get("7d", false).await.unwrap();
    assert!(refreshed.from_cache);
    assert!(!refreshed.stale);
    assert!(!Arc::ptr_eq(&first.value, &refreshed.value));
}

#[tokio::test]
async fn concurrent_requests_join_one_inflight_fetch() {
    let port = Arc::new(
        MockGatewayPort::returning(vec![blocked("ads.example.com")])
            .with_delay(Duration::from_millis(20)),
    );
    let cache = cache_with(port.clone(), FakeClock::at(NOW_MS));

    let (a, b) = tokio::join!(cache.get("7d", false), cache.get("7d", false));
    let (a, b) = (a.unwrap(), b.unwrap());

    // One collection run total, shared by both callers.
    assert_eq!(port.call_count(), 7);
    assert!(Arc::ptr_eq(&a.value, &b.value));
}

#[tokio::test]
async fn forced_refresh_cancels_the_inflight_fetch_and_supersedes_it() {
    let forced = Arc::new(AtomicBool::new(false));
    let responder_forced = forced.clone();
    let port = Arc::new(
        MockGatewayPort::new(move |_: Segment, _| {
            let name = if responder_forced.load(Ordering::SeqCst) {
                "forced.test"
            } else {
                "first.test"
            };
            Ok(vec![blocked(name)])
        })
        .with_delay(Duration::from_millis(50)),
    );
    let cache = cache_with(port.clone(), FakeClock::at(NOW_MS));

    let slow_cache = cache.clone();
    let slow = tokio::spawn(async move { slow_cache.get("7d", false).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    forced.store(true, Ordering::SeqCst);
    let view = cache.get("7d", true).await.unwrap();

    // The superseded request observes cancellation, never a partial result.
    let slow_result = slow.await.unwrap();
    assert!(matches!(slow_result, Err(DomainError::Cancelled)));

    // Cache and response reflect only the forced fetch.
    assert_eq!(view.value.summary.top_blocked[0].name, "forced.test");
    let cached = cache.get("7d", false).await.unwrap();
    assert!(cached.from_cache);
    assert_eq!(cached.value.summary.top_blocked[0].name, "forced.test");
}

#[tokio::test]
async fn empty_upstream_yields_zero_summary_with_fallback_marked() {
    let port = Arc::new(MockGatewayPort::new(|_, _| Ok(vec![])));
    let cache = cache_with(port.clone(), FakeClock::at(NOW_MS));

    let view = cache.get("7d", false).await.unwrap();

    assert!(view.value.summary.is_empty());
    assert!(view.value.summary.top_blocked.is_empty());
    assert!(view.value.trace.fallback_used);
    assert_eq!(view.value.effective_range_key, "latest");
    // Exactly one unbounded fallback call.
    assert_eq!(
        port.calls().iter().filter(|s| s.is_unbounded()).count(),
        1
    );
}

#[tokio::test]
async fn prefetch_warms_missing_entries_and_skips_fresh_ones() {
    let port = Arc::new(MockGatewayPort::returning(vec![blocked("ads.example.com")]));
    let cache = cache_with(port.clone(), FakeClock::at(NOW_MS));

    let rotation = cache.begin_prefetch_rotation();
    cache.prefetch("30d", &rotation).await.unwrap();
    assert!(cache.is_fresh("30d"));
    let calls_after_warm = port.call_count();

    // Already fresh: a second prefetch is a no-op.
    cache.prefetch("30d", &rotation).await.unwrap();
    assert_eq!(port.call_count(), calls_after_warm);
}

#[tokio::test]
async fn user_request_cancels_a_running_prefetch() {
    let port = Arc::new(
        MockGatewayPort::returning(vec![blocked("ads.example.com")])
            .with_delay(Duration::from_millis(100)),
    );
    let cache = cache_with(port.clone(), FakeClock::at(NOW_MS));

    let rotation = cache.begin_prefetch_rotation();
    let prefetch_cache = cache.clone();
    let prefetch = tokio::spawn(async move { prefetch_cache.prefetch("90d", &rotation).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Foreground traffic takes priority: the rotation dies immediately.
    let served = cache.get("24h", false).await.unwrap();
    assert!(!served.from_cache);

    let prefetch_result = prefetch.await.unwrap();
    assert!(matches!(prefetch_result, Err(DomainError::Cancelled)));
    assert!(!cache.is_fresh("90d"));
}
