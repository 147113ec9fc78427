//! Gatewatch Infrastructure Layer
//!
//! Adapters behind the application ports: the HTTP client for the gateway
//! analytics API and the JSON snapshot artifact store.

pub mod artifacts;
pub mod upstream;

pub use artifacts::JsonArtifactStore;
pub use upstream::GatewayLogClient;
