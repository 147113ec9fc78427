pub mod aggregator;
pub mod cache;
pub mod collector;
pub mod fetcher;
pub mod planner;
pub mod post_filter;

pub use cache::{CachedSummary, SummaryCache, SummaryView};
pub use collector::{Collected, LogCollector};
pub use fetcher::SegmentFetcher;
