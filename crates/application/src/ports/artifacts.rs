use async_trait::async_trait;
use gatewatch_domain::{DomainError, FetchTrace, LogRecord, Summary};
use serde::Serialize;

/// Batch-mode output: the aggregate plus run metadata, persisted alongside a
/// bounded raw sample of blocked records.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryArtifact {
    pub range_key: String,
    pub range_label: String,
    pub generated_at_ms: i64,
    pub log_count: usize,
    pub summary: Summary,
    pub trace: FetchTrace,
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write both artifact files, each as an atomic whole-file overwrite.
    async fn persist(
        &self,
        artifact: &SummaryArtifact,
        blocked_sample: &[LogRecord],
    ) -> Result<(), DomainError>;
}
