use crate::dto::{ActivityQuery, ActivityResponse};
use crate::errors::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use gatewatch_domain::{range, DomainError};
use tracing::{debug, error, instrument};

#[instrument(skip(state), name = "api_activity_summary")]
pub async fn get_activity_summary(
    State(state): State<AppState>,
    Query(params): Query<ActivityQuery>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let requested = range::resolve(&params.range);
    let force = params.force_refresh();

    let use_case = state.get_summary.as_ref().ok_or_else(|| {
        let message = state
            .config_error
            .clone()
            .unwrap_or_else(|| "upstream credentials not configured".to_string());
        ApiError::new(requested, DomainError::Config(message))
    })?;

    match use_case.execute(requested.key, force).await {
        Ok(view) => {
            debug!(
                range = requested.key,
                from_cache = view.from_cache,
                stale = view.stale,
                "Activity summary served"
            );
            Ok(Json(ActivityResponse::from_view(requested, view)))
        }
        Err(e) => {
            error!(range = requested.key, error = %e, "Activity summary failed");
            Err(ApiError::new(requested, e))
        }
    }
}
