use super::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Environment aliases accepted for each credential, tried in order.
const ACCOUNT_ALIASES: [&str; 3] = ["GATEWATCH_ACCOUNT_ID", "GATEWAY_ACCOUNT_ID", "ACCOUNT_ID"];
const TOKEN_ALIASES: [&str; 3] = ["GATEWATCH_API_TOKEN", "GATEWAY_API_TOKEN", "API_TOKEN"];
const TTL_ALIAS: &str = "GATEWATCH_CACHE_TTL_MS";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Analytics API base URL; the account path and query string are fixed.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub account_id: Option<String>,

    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-call record limit passed to the upstream API.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Per-upstream-call timeout in seconds. There is no pipeline-wide
    /// deadline; segmentation bounds total work instead.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            account_id: None,
            api_token: None,
            page_limit: default_page_limit(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.gateway-analytics.example/v1".to_string()
}

fn default_page_limit() -> u32 {
    1000
}

fn default_request_timeout() -> u64 {
    30
}

/// Resolved, validated credentials. Construction fails fast when either
/// value is missing or still the `YOUR_*` placeholder.
#[derive(Debug, Clone)]
pub struct UpstreamCredentials {
    pub account_id: String,
    pub api_token: String,
}

fn is_placeholder(value: &str) -> bool {
    value.trim().is_empty() || value.trim().starts_with("YOUR_")
}

fn from_env(aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !is_placeholder(value))
}

impl UpstreamConfig {
    /// Pull credentials and TTL from the environment, overriding file values.
    /// Placeholder values (`YOUR_ACCOUNT_ID` etc.) are treated as absent.
    pub fn resolve_env(&mut self) {
        if let Some(account) = from_env(&ACCOUNT_ALIASES) {
            self.account_id = Some(account);
        }
        if let Some(token) = from_env(&TOKEN_ALIASES) {
            self.api_token = Some(token);
        }
    }

    pub fn credentials(&self) -> Result<UpstreamCredentials, ConfigError> {
        let account_id = self
            .account_id
            .as_deref()
            .filter(|v| !is_placeholder(v))
            .ok_or(ConfigError::MissingCredential("account id"))?;
        let api_token = self
            .api_token
            .as_deref()
            .filter(|v| !is_placeholder(v))
            .ok_or(ConfigError::MissingCredential("API token"))?;
        Ok(UpstreamCredentials {
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
        })
    }
}

/// Environment override for the cache TTL, in milliseconds.
pub(super) fn ttl_from_env() -> Option<i64> {
    std::env::var(TTL_ALIAS).ok()?.trim().parse().ok()
}
