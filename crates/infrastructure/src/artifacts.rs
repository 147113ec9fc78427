use async_trait::async_trait;
use gatewatch_application::ports::{ArtifactStore, SummaryArtifact};
use gatewatch_domain::{DomainError, LogRecord};
use std::path::PathBuf;
use tracing::info;

pub const SUMMARY_FILE: &str = "summary.json";
pub const BLOCKED_SAMPLE_FILE: &str = "blocked-sample.json";

/// Writes snapshot artifacts as JSON files under a fixed directory.
///
/// Each file is written to a `.tmp` sibling first and renamed into place, so
/// a reader never observes a half-written file.
pub struct JsonArtifactStore {
    dir: PathBuf,
}

impl JsonArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn write_atomic(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::ArtifactWrite(e.to_string()))?;
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| DomainError::ArtifactWrite(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| DomainError::ArtifactWrite(e.to_string()))
    }
}

#[async_trait]
impl ArtifactStore for JsonArtifactStore {
    async fn persist(
        &self,
        artifact: &SummaryArtifact,
        blocked_sample: &[LogRecord],
    ) -> Result<(), DomainError> {
        let summary = serde_json::to_vec_pretty(artifact)
            .map_err(|e| DomainError::ArtifactWrite(e.to_string()))?;
        let sample = serde_json::to_vec_pretty(blocked_sample)
            .map_err(|e| DomainError::ArtifactWrite(e.to_string()))?;

        self.write_atomic(SUMMARY_FILE, &summary).await?;
        self.write_atomic(BLOCKED_SAMPLE_FILE, &sample).await?;

        info!(
            dir = %self.dir.display(),
            range = %artifact.range_key,
            log_count = artifact.log_count,
            "Snapshot artifacts written"
        );
        Ok(())
    }
}
