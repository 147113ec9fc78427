use gatewatch_domain::{RangeDescriptor, Segment};

const DAY_SECS: i64 = 86_400;

/// Unbounded ranges are walked backward in fixed 30-day windows.
const UNBOUNDED_STEP_SECS: i64 = 30 * DAY_SECS;

/// Hard cap on unbounded planning: 360 segments of 30 days is roughly 30
/// years of history, which bounds worst-case upstream call volume.
pub const MAX_UNBOUNDED_SEGMENTS: usize = 360;

/// Segment span by requested day count. Larger ranges get coarser segments
/// to balance call count against per-call response size.
fn step_secs(days: u32) -> i64 {
    match days {
        0..=1 => 6 * 3600,
        2..=7 => DAY_SECS,
        8..=30 => 3 * DAY_SECS,
        31..=90 => 7 * DAY_SECS,
        _ => 14 * DAY_SECS,
    }
}

/// Plan the upstream query windows for a range, newest first. The
/// newest-to-oldest order is what makes the collector's empty-streak early
/// stop meaningful for unbounded ranges.
pub fn plan(descriptor: &RangeDescriptor, now_secs: i64) -> Vec<Segment> {
    match descriptor.days {
        Some(days) => plan_bounded(days, now_secs),
        None => plan_unbounded(now_secs),
    }
}

fn plan_bounded(days: u32, now: i64) -> Vec<Segment> {
    let earliest = now - i64::from(days) * DAY_SECS;
    if earliest == now {
        // d = 0: a single degenerate window.
        return vec![Segment::bounded(now, now)];
    }

    let step = step_secs(days);
    let mut segments = Vec::new();
    let mut to = now;
    while to > earliest {
        let from = (to - step).max(earliest);
        segments.push(Segment::bounded(from, to));
        to = from;
    }
    segments
}

fn plan_unbounded(now: i64) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(MAX_UNBOUNDED_SEGMENTS);
    let mut to = now;
    for _ in 0..MAX_UNBOUNDED_SEGMENTS {
        let from = to - UNBOUNDED_STEP_SECS;
        segments.push(Segment::bounded(from, to));
        to = from;
    }
    segments
}
