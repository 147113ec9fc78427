use crate::range::RangeDescriptor;
use serde::Serialize;

/// Progress trace for one collection run: segment counters, ordered
/// human-readable progress messages, and the resolved effective range.
/// Created at the start of a run, returned alongside the logs, embedded in
/// the response metadata, then discarded with its cache entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchTrace {
    pub segments_planned: u32,
    pub segments_attempted: u32,
    pub segments_succeeded: u32,
    pub segments_failed: u32,
    pub progress: Vec<String>,
    pub fallback_used: bool,
    pub effective_range_key: String,
    pub effective_range_label: String,
}

impl FetchTrace {
    pub fn new(descriptor: &RangeDescriptor) -> Self {
        FetchTrace {
            effective_range_key: descriptor.key.to_string(),
            effective_range_label: descriptor.label.to_string(),
            ..FetchTrace::default()
        }
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.progress.push(message.into());
    }

    pub fn set_effective_range(&mut self, descriptor: &RangeDescriptor) {
        self.effective_range_key = descriptor.key.to_string();
        self.effective_range_label = descriptor.label.to_string();
    }

    /// Replace the label only, keeping the key (used when the post-filter
    /// derives a narrower coverage description).
    pub fn set_effective_label(&mut self, label: impl Into<String>) {
        self.effective_range_label = label.into();
    }
}
