use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Upstream gateway timeout")]
    UpstreamTimeout,

    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Invalid upstream payload: {0}")]
    InvalidPayload(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Artifact write failed: {0}")]
    ArtifactWrite(String),
}

impl DomainError {
    /// Segment-level failures are recovered by the collector; anything else
    /// (cancellation, configuration) aborts the run.
    pub fn is_segment_failure(&self) -> bool {
        matches!(
            self,
            DomainError::UpstreamStatus { .. }
                | DomainError::UpstreamTimeout
                | DomainError::Transport(_)
                | DomainError::InvalidPayload(_)
        )
    }
}
