use gatewatch_domain::RangeDescriptor;
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct RangesResponse {
    pub ranges: Vec<RangeDescriptor>,
    pub default: &'static str,
}
