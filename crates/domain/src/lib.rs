//! Gatewatch Domain Layer
pub mod config;
pub mod errors;
pub mod log_record;
pub mod range;
pub mod segment;
pub mod summary;
pub mod timestamp;
pub mod trace;

pub use config::Config;
pub use errors::DomainError;
pub use log_record::LogRecord;
pub use range::RangeDescriptor;
pub use segment::Segment;
pub use summary::{BlockedDomain, Summary, Totals};
pub use timestamp::LogTimestamp;
pub use trace::FetchTrace;
