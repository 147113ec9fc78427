use crate::dto::RangesResponse;
use axum::Json;
use gatewatch_domain::range::{DEFAULT_RANGE, RANGES};

pub async fn get_ranges() -> Json<RangesResponse> {
    Json(RangesResponse {
        ranges: RANGES.to_vec(),
        default: DEFAULT_RANGE,
    })
}
