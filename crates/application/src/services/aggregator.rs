use gatewatch_domain::{BlockedDomain, LogRecord, Summary, Totals};
use std::collections::HashMap;

/// Classify, count, and rank. Stateless; every run produces a fresh value.
pub fn summarize(logs: &[LogRecord], top_n: usize) -> Summary {
    let mut totals = Totals::default();
    let mut by_name: HashMap<String, u64> = HashMap::new();
    let mut by_root: HashMap<String, u64> = HashMap::new();

    for log in logs {
        if log.is_blocked() {
            totals.blocked += 1;
            if let Some(name) = log.destination() {
                *by_name.entry(name.to_ascii_lowercase()).or_insert(0) += 1;
            }
            if let Some(root) = log.base_domain() {
                *by_root.entry(root).or_insert(0) += 1;
            }
        } else {
            totals.allowed += 1;
        }
    }

    Summary {
        top_blocked: rank(by_name, top_n),
        top_blocked_roots: rank(by_root, top_n),
        totals,
    }
}

fn rank(counts: HashMap<String, u64>, top_n: usize) -> Vec<BlockedDomain> {
    let mut ranked: Vec<BlockedDomain> = counts
        .into_iter()
        .map(|(name, count)| BlockedDomain { name, count })
        .collect();
    // Deterministic ordering: count descending, then name.
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(top_n);
    ranked
}

/// Bounded sample of raw blocked records, in collection order, for the
/// raw-sample artifact.
pub fn blocked_sample(logs: &[LogRecord], cap: usize) -> Vec<LogRecord> {
    logs.iter()
        .filter(|log| log.is_blocked())
        .take(cap)
        .cloned()
        .collect()
}
