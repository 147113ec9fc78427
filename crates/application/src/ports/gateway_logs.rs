use async_trait::async_trait;
use gatewatch_domain::{DomainError, LogRecord, Segment};
use tokio_util::sync::CancellationToken;

/// One upstream analytics API call per segment.
///
/// Implementations must abort promptly when `cancel` fires and return
/// `DomainError::Cancelled`; a 504 maps to `DomainError::UpstreamTimeout`
/// so the fetcher can retry via bisection.
#[async_trait]
pub trait GatewayLogPort: Send + Sync {
    async fn fetch_logs(
        &self,
        segment: Segment,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogRecord>, DomainError>;
}
