use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Summary cache TTL in milliseconds. Default 6 hours.
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: i64,

    /// Number of blocked destinations returned in the aggregate.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Background cache warming of other ranges after each served request.
    #[serde(default = "default_prefetch")]
    pub prefetch: bool,

    /// Directory for batch-mode JSON artifacts. `None` disables the
    /// periodic snapshot job.
    #[serde(default)]
    pub snapshot_dir: Option<String>,

    /// Range persisted by the snapshot job.
    #[serde(default = "default_snapshot_range")]
    pub snapshot_range: String,

    /// Snapshot job interval in seconds. Default 6 hours.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_secs: u64,

    /// Cap on the raw blocked-record sample kept per cache entry and written
    /// to the raw-sample artifact.
    #[serde(default = "default_sample_cap")]
    pub blocked_sample_cap: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
            top_n: default_top_n(),
            prefetch: default_prefetch(),
            snapshot_dir: None,
            snapshot_range: default_snapshot_range(),
            snapshot_interval_secs: default_snapshot_interval(),
            blocked_sample_cap: default_sample_cap(),
        }
    }
}

fn default_ttl_ms() -> i64 {
    6 * 60 * 60 * 1000
}

fn default_top_n() -> usize {
    15
}

fn default_prefetch() -> bool {
    true
}

fn default_snapshot_range() -> String {
    "7d".to_string()
}

fn default_snapshot_interval() -> u64 {
    6 * 60 * 60
}

fn default_sample_cap() -> usize {
    500
}
