use crate::ports::Clock;
use crate::services::{fetcher::SegmentFetcher, planner};
use gatewatch_domain::{range, DomainError, FetchTrace, LogRecord, RangeDescriptor, Segment};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Running-total cap for unbounded ranges. Bounded ranges are uncapped; the
/// planner already limits their window.
pub const UNBOUNDED_LOG_CAP: usize = 200_000;

/// Consecutive empty segments treated as "no more historical data" when
/// walking an unbounded range backward.
pub const EMPTY_STREAK_LIMIT: u32 = 3;

#[derive(Debug)]
pub struct Collected {
    pub logs: Vec<LogRecord>,
    pub trace: FetchTrace,
}

/// Drives the planner and fetcher across all segments of a range. Segment
/// failures degrade completeness, never availability: they are recorded in
/// the trace and collection continues. Only cancellation aborts the run.
pub struct LogCollector {
    fetcher: SegmentFetcher,
    clock: Arc<dyn Clock>,
}

impl LogCollector {
    pub fn new(fetcher: SegmentFetcher, clock: Arc<dyn Clock>) -> Self {
        Self { fetcher, clock }
    }

    pub async fn collect(
        &self,
        descriptor: &RangeDescriptor,
        cancel: &CancellationToken,
    ) -> Result<Collected, DomainError> {
        let mut trace = FetchTrace::new(descriptor);
        let segments = planner::plan(descriptor, self.clock.now_secs());
        let unbounded = descriptor.days.is_none();

        trace.segments_planned = segments.len() as u32;
        trace.note(format!(
            "planned {} segment(s) for range {}",
            segments.len(),
            descriptor.key
        ));

        let mut logs: Vec<LogRecord> = Vec::new();
        let mut empty_streak = 0u32;

        for (idx, segment) in segments.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(DomainError::Cancelled);
            }
            if unbounded && logs.len() >= UNBOUNDED_LOG_CAP {
                trace.note(format!(
                    "log cap of {UNBOUNDED_LOG_CAP} reached after {idx} segment(s), stopping early"
                ));
                break;
            }

            trace.segments_attempted += 1;
            match self.fetcher.fetch(*segment, cancel).await {
                Ok(batch) => {
                    trace.segments_succeeded += 1;
                    debug!(
                        segment = idx + 1,
                        total = segments.len(),
                        logs = batch.len(),
                        range = descriptor.key,
                        "Segment fetched"
                    );
                    trace.note(format!(
                        "segment {}/{}: {} log(s)",
                        idx + 1,
                        segments.len(),
                        batch.len()
                    ));

                    if unbounded {
                        if batch.is_empty() {
                            empty_streak += 1;
                            if empty_streak >= EMPTY_STREAK_LIMIT {
                                trace.note(format!(
                                    "{EMPTY_STREAK_LIMIT} consecutive empty segments, assuming no more history"
                                ));
                                logs.extend(batch);
                                break;
                            }
                        } else {
                            empty_streak = 0;
                        }
                    }
                    logs.extend(batch);
                }
                Err(DomainError::Cancelled) => return Err(DomainError::Cancelled),
                Err(e) if e.is_segment_failure() => {
                    trace.segments_failed += 1;
                    warn!(
                        segment = idx + 1,
                        range = descriptor.key,
                        error = %e,
                        "Segment failed, continuing with remaining segments"
                    );
                    trace.note(format!("segment {}/{} failed: {}", idx + 1, segments.len(), e));
                }
                Err(e) => return Err(e),
            }
        }

        // The requested range produced nothing at all: one unbounded "most
        // recent records" query so the dashboard never shows a hard-empty
        // result while any data exists upstream.
        if logs.is_empty() {
            if cancel.is_cancelled() {
                return Err(DomainError::Cancelled);
            }
            trace.note("range yielded no logs, falling back to latest available records");
            trace.fallback_used = true;
            trace.set_effective_range(&range::LATEST);

            match self.fetcher.fetch(Segment::LATEST, cancel).await {
                Ok(batch) => {
                    trace.note(format!("fallback returned {} log(s)", batch.len()));
                    logs = batch;
                }
                Err(DomainError::Cancelled) => return Err(DomainError::Cancelled),
                Err(e) if e.is_segment_failure() => {
                    warn!(error = %e, "Fallback query failed");
                    trace.note(format!("fallback query failed: {e}"));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Collected { logs, trace })
    }
}
