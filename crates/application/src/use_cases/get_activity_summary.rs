use crate::services::{SummaryCache, SummaryView};
use gatewatch_domain::DomainError;

pub struct GetActivitySummaryUseCase {
    cache: SummaryCache,
}

impl GetActivitySummaryUseCase {
    pub fn new(cache: SummaryCache) -> Self {
        Self { cache }
    }

    pub async fn execute(&self, range_key: &str, force: bool) -> Result<SummaryView, DomainError> {
        self.cache.get(range_key, force).await
    }
}
