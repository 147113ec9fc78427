//! Gatewatch Application Layer
//!
//! Ports (async traits at the seams) and the log retrieval, segmentation,
//! and caching pipeline that drives them.
pub mod ports;
pub mod services;
pub mod use_cases;
