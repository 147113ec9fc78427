use gatewatch_application::services::SummaryCache;
use gatewatch_domain::{range, DomainError};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Background job that warms the other ranges after a user request.
///
/// The cache announces every successfully served range key on an mpsc
/// channel. Each announcement starts a rotation over the remaining ranges,
/// one fetch at a time, skipping fresh entries. Any new user request cancels
/// the rotation token, so warming never competes with foreground traffic.
pub struct PrefetchJob {
    cache: SummaryCache,
    served: Mutex<Option<mpsc::Receiver<&'static str>>>,
    shutdown: CancellationToken,
}

impl PrefetchJob {
    pub fn new(cache: SummaryCache, served: mpsc::Receiver<&'static str>) -> Self {
        Self {
            cache,
            served: Mutex::new(Some(served)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!("Starting prefetch job");

        let Some(mut served) = self.served.lock().unwrap().take() else {
            warn!("Prefetch job started twice, ignoring");
            return;
        };

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("PrefetchJob: shutting down");
                        break;
                    }
                    key = served.recv() => match key {
                        Some(key) => self.run_rotation(key).await,
                        None => {
                            info!("PrefetchJob: notifier closed, stopping");
                            break;
                        }
                    }
                }
            }
        });
    }

    async fn run_rotation(&self, served_key: &str) {
        let rotation = self.cache.begin_prefetch_rotation();
        debug!(served = served_key, "Starting prefetch rotation");

        for descriptor in &range::RANGES {
            if descriptor.key == served_key || self.cache.is_fresh(descriptor.key) {
                continue;
            }
            if rotation.is_cancelled() {
                debug!("Prefetch rotation cancelled by user traffic");
                return;
            }
            match self.cache.prefetch(descriptor.key, &rotation).await {
                Ok(()) => debug!(range = descriptor.key, "Prefetched range"),
                Err(DomainError::Cancelled) => {
                    debug!("Prefetch rotation cancelled by user traffic");
                    return;
                }
                Err(e) => {
                    warn!(range = descriptor.key, error = %e, "Prefetch failed, continuing");
                }
            }
        }
    }
}
