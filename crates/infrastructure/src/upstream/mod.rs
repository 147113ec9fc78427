mod client;

pub use client::GatewayLogClient;
