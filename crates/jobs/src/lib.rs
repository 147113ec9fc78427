//! Gatewatch Background Jobs
//!
//! Long-running tasks spawned alongside the web server: cache prefetch
//! rotations after user traffic and periodic snapshot artifacts.

pub mod prefetch;
pub mod runner;
pub mod snapshot;

pub use prefetch::PrefetchJob;
pub use runner::JobRunner;
pub use snapshot::SnapshotJob;
