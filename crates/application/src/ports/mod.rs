mod artifacts;
mod clock;
mod gateway_logs;

pub use artifacts::{ArtifactStore, SummaryArtifact};
pub use clock::{Clock, SystemClock};
pub use gateway_logs::GatewayLogPort;
