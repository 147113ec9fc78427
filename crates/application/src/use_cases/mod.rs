mod get_activity_summary;

pub use get_activity_summary::GetActivitySummaryUseCase;
