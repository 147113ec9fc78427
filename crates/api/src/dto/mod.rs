mod activity;
mod range;

pub use activity::{ActivityQuery, ActivityResponse, MetaDto};
pub use range::RangesResponse;
