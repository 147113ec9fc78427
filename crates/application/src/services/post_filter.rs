use gatewatch_domain::{LogRecord, RangeDescriptor};

const DAY_MS: i64 = 86_400_000;

#[derive(Debug)]
pub struct Filtered {
    pub logs: Vec<LogRecord>,
    /// Human-readable coverage description derived from the data actually
    /// present. `None` when nothing narrower than the requested label can be
    /// claimed (no parseable timestamps at all).
    pub coverage_label: Option<String>,
}

/// Re-filter collected logs to the requested day window.
///
/// Upstream data may lag real-world time, so the newest known timestamp is
/// used as the "now" anchor. Records whose timestamps cannot be parsed are
/// kept: silently discarding possibly-relevant data is worse than
/// over-inclusion.
pub fn filter_to_range(logs: Vec<LogRecord>, descriptor: &RangeDescriptor) -> Filtered {
    match descriptor.days {
        Some(days) => filter_bounded(logs, descriptor, days),
        None => {
            let coverage_label = Some(unbounded_label(&logs));
            Filtered {
                logs,
                coverage_label,
            }
        }
    }
}

fn filter_bounded(logs: Vec<LogRecord>, descriptor: &RangeDescriptor, days: u32) -> Filtered {
    let anchor = logs.iter().filter_map(|log| log.timestamp_ms()).max();
    let anchor = match anchor {
        Some(anchor) => anchor,
        // No parseable timestamps anywhere: nothing to filter on.
        None => {
            return Filtered {
                logs,
                coverage_label: None,
            }
        }
    };

    let cutoff = anchor - i64::from(days) * DAY_MS;
    let logs: Vec<LogRecord> = logs
        .into_iter()
        .filter(|log| match log.timestamp_ms() {
            Some(ts) => ts >= cutoff,
            None => true,
        })
        .collect();

    let oldest_known = logs.iter().filter_map(|log| log.timestamp_ms()).min();
    let coverage_label = oldest_known.map(|oldest| {
        let covered_days = covered_days(oldest, anchor);
        if covered_days >= i64::from(days) {
            descriptor.label.to_string()
        } else {
            coverage_label(covered_days)
        }
    });

    Filtered {
        logs,
        coverage_label,
    }
}

fn covered_days(oldest_ms: i64, newest_ms: i64) -> i64 {
    let span = (newest_ms - oldest_ms).max(0);
    (span + DAY_MS - 1) / DAY_MS
}

fn coverage_label(days: i64) -> String {
    if days <= 1 {
        "Last ~1 day".to_string()
    } else {
        format!("Last ~{days} days")
    }
}

fn unbounded_label(logs: &[LogRecord]) -> String {
    let known: Vec<i64> = logs.iter().filter_map(|log| log.timestamp_ms()).collect();
    match (known.iter().min(), known.iter().max()) {
        (Some(oldest), Some(newest)) if !logs.is_empty() => {
            format!(
                "{} records covering ~{} day(s)",
                logs.len(),
                covered_days(*oldest, *newest).max(1)
            )
        }
        _ => format!("{} most recent records", logs.len()),
    }
}
