use crate::dto::ActivityResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gatewatch_domain::{DomainError, RangeDescriptor};

/// An activity request that could not be served. Carries the requested range
/// so the error payload keeps the same shape as a success response.
pub struct ApiError {
    requested: &'static RangeDescriptor,
    error: DomainError,
}

impl ApiError {
    pub fn new(requested: &'static RangeDescriptor, error: DomainError) -> Self {
        Self { requested, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Missing credentials are the only hard failure; anything that goes
        // wrong after that still renders as a zeroed summary.
        let status = match &self.error {
            DomainError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        };
        let payload = ActivityResponse::error_payload(self.requested, self.error.to_string());
        (status, Json(payload)).into_response()
    }
}
