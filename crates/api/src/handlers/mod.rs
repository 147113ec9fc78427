pub mod activity;
pub mod health;
pub mod ranges;

pub use activity::get_activity_summary;
pub use health::health_check;
pub use ranges::get_ranges;
