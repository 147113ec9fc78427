use crate::ports::GatewayLogPort;
use futures::future::BoxFuture;
use gatewatch_domain::{DomainError, LogRecord, Segment};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A segment still timing out after five bisections spans less than 2
/// minutes of a multi-hour window; at that point the upstream is treated as
/// failed for the segment rather than narrowed further.
pub const MAX_BISECTION_DEPTH: u32 = 5;

/// Segments of an hour or less are not worth bisecting.
pub const MIN_BISECT_SPAN_SECS: i64 = 3600;

/// Issues one upstream call per segment, narrowing timed-out windows by
/// recursive bisection until they succeed or the depth bound is hit.
pub struct SegmentFetcher {
    port: Arc<dyn GatewayLogPort>,
    page_limit: u32,
}

impl SegmentFetcher {
    pub fn new(port: Arc<dyn GatewayLogPort>, page_limit: u32) -> Self {
        Self { port, page_limit }
    }

    pub async fn fetch(
        &self,
        segment: Segment,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogRecord>, DomainError> {
        self.fetch_at_depth(segment, 0, cancel).await
    }

    fn fetch_at_depth<'a>(
        &'a self,
        segment: Segment,
        depth: u32,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<LogRecord>, DomainError>> {
        Box::pin(async move {
            if cancel.is_cancelled() {
                return Err(DomainError::Cancelled);
            }

            match self.port.fetch_logs(segment, self.page_limit, cancel).await {
                Err(DomainError::UpstreamTimeout) if self.should_bisect(segment, depth) => {
                    let (first, second) = match segment.bisect() {
                        Some(halves) => halves,
                        None => return Err(DomainError::UpstreamTimeout),
                    };
                    debug!(
                        from = ?segment.from,
                        to = ?segment.to,
                        depth,
                        "Segment timed out upstream, bisecting and retrying"
                    );
                    // Halves are fetched sequentially, never in parallel, to
                    // bound concurrent load on the upstream API.
                    let mut logs = self.fetch_at_depth(first, depth + 1, cancel).await?;
                    logs.extend(self.fetch_at_depth(second, depth + 1, cancel).await?);
                    Ok(logs)
                }
                other => other,
            }
        })
    }

    fn should_bisect(&self, segment: Segment, depth: u32) -> bool {
        depth < MAX_BISECTION_DEPTH
            && segment
                .span_secs()
                .is_some_and(|span| span > MIN_BISECT_SPAN_SECS)
    }
}
