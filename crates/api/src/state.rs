use gatewatch_application::use_cases::GetActivitySummaryUseCase;
use std::sync::Arc;

/// Shared handler state. The use case is absent when upstream credentials
/// failed to resolve at startup; the stored message is served instead so the
/// dashboard can explain why no data appears.
#[derive(Clone)]
pub struct AppState {
    pub get_summary: Option<Arc<GetActivitySummaryUseCase>>,
    pub config_error: Option<String>,
}

impl AppState {
    pub fn ready(get_summary: Arc<GetActivitySummaryUseCase>) -> Self {
        Self {
            get_summary: Some(get_summary),
            config_error: None,
        }
    }

    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self {
            get_summary: None,
            config_error: Some(message.into()),
        }
    }
}
