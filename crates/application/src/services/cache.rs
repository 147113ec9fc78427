use crate::ports::{Clock, GatewayLogPort};
use crate::services::{aggregator, collector::LogCollector, fetcher::SegmentFetcher, post_filter};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use gatewatch_domain::{range, DomainError, FetchTrace, LogRecord, RangeDescriptor, Summary};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// One cached collection result for a range. Immutable once built; handed
/// out as an `Arc` snapshot and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CachedSummary {
    pub summary: Summary,
    pub effective_range_key: String,
    pub effective_range_label: String,
    pub trace: FetchTrace,
    pub log_count: usize,
    pub blocked_sample: Vec<LogRecord>,
    pub fetched_at_ms: i64,
    pub expires_at_ms: i64,
}

/// What a caller receives: the snapshot plus how it was served.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub value: Arc<CachedSummary>,
    pub from_cache: bool,
    pub stale: bool,
}

type FetchOutcome = Result<Arc<CachedSummary>, DomainError>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

/// A pending collection run. Concurrent requests for the same range clone
/// the shared future instead of issuing duplicate upstream work; a forced
/// refresh cancels the token and supersedes the whole handle.
#[derive(Clone)]
struct Inflight {
    epoch: u64,
    token: CancellationToken,
    fut: SharedFetch,
}

#[derive(Default)]
struct Entry {
    value: Option<Arc<CachedSummary>>,
    inflight: Option<Inflight>,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub ttl_ms: i64,
    pub top_n: usize,
    pub page_limit: u32,
    pub blocked_sample_cap: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_ms: 6 * 60 * 60 * 1000,
            top_n: 15,
            page_limit: 1000,
            blocked_sample_cap: 500,
        }
    }
}

struct Inner {
    entries: Mutex<HashMap<&'static str, Entry>>,
    port: Arc<dyn GatewayLogPort>,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
    epochs: AtomicU64,
    prefetch_rotation: Mutex<CancellationToken>,
    served_tx: Mutex<Option<mpsc::Sender<&'static str>>>,
}

/// Per-range summary cache with stale-while-revalidate semantics. Cheap to
/// clone; all clones share one entry map.
///
/// State machine per key: EMPTY -> FETCHING -> FRESH -> STALE ->
/// FETCHING(refresh) -> FRESH -> ... All mutation happens behind the entry
/// map lock, which is never held across an await.
#[derive(Clone)]
pub struct SummaryCache {
    inner: Arc<Inner>,
}

enum Plan {
    Fresh(Arc<CachedSummary>),
    Stale(Arc<CachedSummary>),
    Await(Inflight),
}

impl SummaryCache {
    pub fn new(
        port: Arc<dyn GatewayLogPort>,
        clock: Arc<dyn Clock>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                port,
                clock,
                settings,
                epochs: AtomicU64::new(1),
                prefetch_rotation: Mutex::new(CancellationToken::new()),
                served_tx: Mutex::new(None),
            }),
        }
    }

    /// Serve a range, fetching or refreshing as the entry state demands.
    ///
    /// User-facing latency takes priority over cache warming, so any running
    /// prefetch rotation is cancelled up front.
    pub async fn get(&self, key: &str, force_refresh: bool) -> Result<SummaryView, DomainError> {
        let descriptor = range::resolve(key);
        self.cancel_prefetch_rotation();

        let plan = self.plan_request(descriptor, force_refresh);
        let view = match plan {
            Plan::Fresh(value) => {
                debug!(range = descriptor.key, "Cache hit (fresh)");
                SummaryView {
                    value,
                    from_cache: true,
                    stale: false,
                }
            }
            Plan::Stale(value) => {
                debug!(
                    range = descriptor.key,
                    "Cache hit (stale), refreshing in background"
                );
                SummaryView {
                    value,
                    from_cache: true,
                    stale: true,
                }
            }
            Plan::Await(inflight) => SummaryView {
                value: self.drive(descriptor.key, inflight).await?,
                from_cache: false,
                stale: false,
            },
        };

        self.notify_served(descriptor.key);
        Ok(view)
    }

    fn plan_request(&self, descriptor: &'static RangeDescriptor, force: bool) -> Plan {
        let now = self.inner.clock.now_ms();
        let mut entries = self.inner.entries.lock().unwrap();
        let entry = entries.entry(descriptor.key).or_default();

        if force {
            // Supersede any in-flight fetch: its driver will see a stale
            // epoch and leave the entry alone.
            if let Some(old) = entry.inflight.take() {
                old.token.cancel();
            }
            let inflight = self.new_inflight(descriptor, None);
            entry.inflight = Some(inflight.clone());
            return Plan::Await(inflight);
        }

        if let Some(value) = &entry.value {
            if now < value.expires_at_ms {
                return Plan::Fresh(Arc::clone(value));
            }
            // Stale: serve immediately, refresh for subsequent callers.
            let live_refresh = entry
                .inflight
                .as_ref()
                .is_some_and(|i| !i.token.is_cancelled());
            if !live_refresh {
                let inflight = self.new_inflight(descriptor, None);
                entry.inflight = Some(inflight.clone());
                let cache = self.clone();
                tokio::spawn(async move {
                    if let Err(e) = cache.drive(descriptor.key, inflight).await {
                        warn!(range = descriptor.key, error = %e, "Background refresh failed");
                    }
                });
            }
            return Plan::Stale(Arc::clone(value));
        }

        match entry.inflight.as_ref().filter(|i| !i.token.is_cancelled()) {
            Some(inflight) => Plan::Await(inflight.clone()),
            None => {
                let inflight = self.new_inflight(descriptor, None);
                entry.inflight = Some(inflight.clone());
                Plan::Await(inflight)
            }
        }
    }

    /// Await the shared fetch and commit the outcome. The epoch check keeps
    /// superseded fetches from clobbering the entry: on cancellation the
    /// entry simply reverts to whatever it held before.
    async fn drive(&self, key: &'static str, inflight: Inflight) -> FetchOutcome {
        let result = inflight.fut.clone().await;
        let mut entries = self.inner.entries.lock().unwrap();
        if let Some(entry) = entries.get_mut(key) {
            let current = entry
                .inflight
                .as_ref()
                .is_some_and(|i| i.epoch == inflight.epoch);
            if current {
                entry.inflight = None;
                if let Ok(value) = &result {
                    entry.value = Some(Arc::clone(value));
                }
            }
        }
        result
    }

    fn new_inflight(
        &self,
        descriptor: &'static RangeDescriptor,
        parent: Option<&CancellationToken>,
    ) -> Inflight {
        let token = match parent {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        Inflight {
            epoch: self.inner.epochs.fetch_add(1, Ordering::Relaxed),
            token: token.clone(),
            fut: self.make_fetch(descriptor, token).boxed().shared(),
        }
    }

    /// The full pipeline for one range: collect -> post-filter -> aggregate.
    fn make_fetch(
        &self,
        descriptor: &'static RangeDescriptor,
        token: CancellationToken,
    ) -> impl Future<Output = FetchOutcome> + Send + 'static {
        let port = Arc::clone(&self.inner.port);
        let clock = Arc::clone(&self.inner.clock);
        let settings = self.inner.settings.clone();

        async move {
            let fetcher = SegmentFetcher::new(port, settings.page_limit);
            let collector = LogCollector::new(fetcher, Arc::clone(&clock));
            let collected = collector.collect(descriptor, &token).await?;

            let mut trace: FetchTrace = collected.trace;
            let effective = range::resolve(&trace.effective_range_key);
            let filtered = post_filter::filter_to_range(collected.logs, effective);
            if let Some(label) = filtered.coverage_label {
                trace.set_effective_label(label);
            }

            let summary = aggregator::summarize(&filtered.logs, settings.top_n);
            let blocked_sample =
                aggregator::blocked_sample(&filtered.logs, settings.blocked_sample_cap);
            let fetched_at_ms = clock.now_ms();

            Ok(Arc::new(CachedSummary {
                summary,
                effective_range_key: trace.effective_range_key.clone(),
                effective_range_label: trace.effective_range_label.clone(),
                log_count: filtered.logs.len(),
                blocked_sample,
                trace,
                fetched_at_ms,
                expires_at_ms: fetched_at_ms + settings.ttl_ms,
            }))
        }
    }

    // ── Prefetch rotation plumbing ──────────────────────────────────────

    /// Register the channel the prefetch job listens on. Every successfully
    /// served range key is announced there.
    pub fn set_served_notifier(&self, tx: mpsc::Sender<&'static str>) {
        *self.inner.served_tx.lock().unwrap() = Some(tx);
    }

    fn notify_served(&self, key: &'static str) {
        if let Some(tx) = self.inner.served_tx.lock().unwrap().as_ref() {
            // A full channel just means a rotation is already pending.
            let _ = tx.try_send(key);
        }
    }

    fn cancel_prefetch_rotation(&self) {
        self.inner.prefetch_rotation.lock().unwrap().cancel();
    }

    /// Start a new rotation, superseding the previous token.
    pub fn begin_prefetch_rotation(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.inner.prefetch_rotation.lock().unwrap() = token.clone();
        token
    }

    pub fn is_fresh(&self, key: &str) -> bool {
        let descriptor = range::resolve(key);
        let now = self.inner.clock.now_ms();
        self.inner
            .entries
            .lock()
            .unwrap()
            .get(descriptor.key)
            .and_then(|entry| entry.value.as_ref())
            .is_some_and(|value| now < value.expires_at_ms)
    }

    /// Warm one range in the background. Joins an existing in-flight fetch
    /// when present; otherwise starts one tied to the rotation token so a
    /// user request cancels it promptly.
    pub async fn prefetch(
        &self,
        key: &str,
        rotation: &CancellationToken,
    ) -> Result<(), DomainError> {
        let descriptor = range::resolve(key);
        let inflight = {
            let now = self.inner.clock.now_ms();
            let mut entries = self.inner.entries.lock().unwrap();
            let entry = entries.entry(descriptor.key).or_default();
            if entry
                .value
                .as_ref()
                .is_some_and(|value| now < value.expires_at_ms)
            {
                return Ok(());
            }
            match entry.inflight.as_ref().filter(|i| !i.token.is_cancelled()) {
                Some(inflight) => inflight.clone(),
                None => {
                    let inflight = self.new_inflight(descriptor, Some(rotation));
                    entry.inflight = Some(inflight.clone());
                    inflight
                }
            }
        };
        self.drive(descriptor.key, inflight).await.map(|_| ())
    }
}
