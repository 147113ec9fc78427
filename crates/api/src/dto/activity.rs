use gatewatch_application::services::SummaryView;
use gatewatch_domain::{BlockedDomain, RangeDescriptor, Totals};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct ActivityQuery {
    #[serde(default = "default_range")]
    pub range: String,

    /// "1" or "true" bypasses the cache and cancels any in-flight fetch.
    #[serde(default)]
    pub force: String,
}

fn default_range() -> String {
    gatewatch_domain::range::DEFAULT_RANGE.to_string()
}

impl ActivityQuery {
    pub fn force_refresh(&self) -> bool {
        self.force == "1" || self.force.eq_ignore_ascii_case("true")
    }
}

/// How the summary was produced, for the dashboard's status line.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MetaDto {
    pub from_cache: bool,
    pub stale: bool,
    pub fetched_at_ms: i64,
    pub fallback_used: bool,
    pub log_count: usize,
    pub segments_planned: u32,
    pub segments_succeeded: u32,
    pub segments_failed: u32,
    pub progress: Vec<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub top_blocked: Vec<BlockedDomain>,
    pub top_blocked_roots: Vec<BlockedDomain>,
    pub totals: Totals,

    /// The range the caller asked for, after key resolution.
    pub requested_range: String,
    /// The range the data actually covers; differs under fallback.
    pub range: String,
    pub range_label: String,

    pub meta: MetaDto,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActivityResponse {
    pub fn from_view(requested: &RangeDescriptor, view: SummaryView) -> Self {
        let value = view.value;
        Self {
            top_blocked: value.summary.top_blocked.clone(),
            top_blocked_roots: value.summary.top_blocked_roots.clone(),
            totals: value.summary.totals,
            requested_range: requested.key.to_string(),
            range: value.effective_range_key.clone(),
            range_label: value.effective_range_label.clone(),
            meta: MetaDto {
                from_cache: view.from_cache,
                stale: view.stale,
                fetched_at_ms: value.fetched_at_ms,
                fallback_used: value.trace.fallback_used,
                log_count: value.log_count,
                segments_planned: value.trace.segments_planned,
                segments_succeeded: value.trace.segments_succeeded,
                segments_failed: value.trace.segments_failed,
                progress: value.trace.progress.clone(),
            },
            error: None,
        }
    }

    /// Zeroed payload carrying an error message; same shape as the success
    /// case so the dashboard renders either without branching.
    pub fn error_payload(requested: &RangeDescriptor, message: String) -> Self {
        Self {
            top_blocked: Vec::new(),
            top_blocked_roots: Vec::new(),
            totals: Totals::default(),
            requested_range: requested.key.to_string(),
            range: requested.key.to_string(),
            range_label: requested.label.to_string(),
            meta: MetaDto {
                from_cache: false,
                stale: false,
                fetched_at_ms: 0,
                fallback_used: false,
                log_count: 0,
                segments_planned: 0,
                segments_succeeded: 0,
                segments_failed: 0,
                progress: Vec::new(),
            },
            error: Some(message),
        }
    }
}
