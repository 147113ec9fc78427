use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_web_port")]
    pub web_port: u16,

    /// Directory served at `/` for the browser dashboard.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            web_port: default_web_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "web/static".to_string()
}
