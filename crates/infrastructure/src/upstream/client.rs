use async_trait::async_trait;
use gatewatch_application::ports::GatewayLogPort;
use gatewatch_domain::config::{UpstreamConfig, UpstreamCredentials};
use gatewatch_domain::{DomainError, LogRecord, Segment};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Error bodies are truncated to this many characters before they enter an
/// error value, so a large HTML error page never bloats logs or responses.
const BODY_SNIPPET_LEN: usize = 256;

#[derive(Deserialize)]
struct LogsEnvelope {
    result: LogsResult,
}

#[derive(Deserialize)]
struct LogsResult {
    #[serde(default)]
    logs: Vec<LogRecord>,
}

/// HTTP adapter for the gateway analytics logs endpoint.
///
/// `GET {base}/accounts/{account}/activity/logs?limit=&from=&to=` with a
/// bearer token. `from`/`to` are omitted for unbounded segments. A 504, like
/// a client-side timeout, surfaces as [`DomainError::UpstreamTimeout`] so the
/// fetcher can bisect the window.
pub struct GatewayLogClient {
    http: reqwest::Client,
    logs_url: String,
    api_token: String,
}

impl GatewayLogClient {
    pub fn new(
        config: &UpstreamConfig,
        credentials: &UpstreamCredentials,
    ) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        let base = config.base_url.trim_end_matches('/');
        Ok(Self {
            http,
            logs_url: format!(
                "{base}/accounts/{}/activity/logs",
                credentials.account_id
            ),
            api_token: credentials.api_token.clone(),
        })
    }

    async fn request(&self, segment: Segment, limit: u32) -> Result<Vec<LogRecord>, DomainError> {
        let mut query: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(from) = segment.from {
            query.push(("from", from.to_string()));
        }
        if let Some(to) = segment.to {
            query.push(("to", to.to_string()));
        }

        debug!(
            from = ?segment.from,
            to = ?segment.to,
            limit,
            "Fetching activity logs"
        );

        let response = self
            .http
            .get(&self.logs_url)
            .bearer_auth(&self.api_token)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::UpstreamTimeout
                } else {
                    DomainError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::GATEWAY_TIMEOUT {
            return Err(DomainError::UpstreamTimeout);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::UpstreamStatus {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let envelope: LogsEnvelope = response
            .json()
            .await
            .map_err(|e| DomainError::InvalidPayload(e.to_string()))?;
        Ok(envelope.result.logs)
    }
}

#[async_trait]
impl GatewayLogPort for GatewayLogClient {
    async fn fetch_logs(
        &self,
        segment: Segment,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogRecord>, DomainError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(DomainError::Cancelled),
            result = self.request(segment, limit) => result,
        }
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GatewayLogClient {
        let config = UpstreamConfig {
            base_url: base_url.to_string(),
            ..UpstreamConfig::default()
        };
        let credentials = UpstreamCredentials {
            account_id: "acct-1".to_string(),
            api_token: "tok-123".to_string(),
        };
        GatewayLogClient::new(&config, &credentials).unwrap()
    }

    #[test]
    fn builds_the_account_scoped_logs_url() {
        let client = client("https://api.example.test/v1");
        assert_eq!(
            client.logs_url,
            "https://api.example.test/v1/accounts/acct-1/activity/logs"
        );
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let client = client("https://api.example.test/v1/");
        assert_eq!(
            client.logs_url,
            "https://api.example.test/v1/accounts/acct-1/activity/logs"
        );
    }

    #[test]
    fn envelope_parses_with_and_without_logs() {
        let full: LogsEnvelope =
            serde_json::from_str(r#"{"result":{"logs":[{"action":"block"}]}}"#).unwrap();
        assert_eq!(full.result.logs.len(), 1);

        let empty: LogsEnvelope = serde_json::from_str(r#"{"result":{}}"#).unwrap();
        assert!(empty.result.logs.is_empty());

        assert!(serde_json::from_str::<LogsEnvelope>(r#"{"unexpected":true}"#).is_err());
    }

    #[test]
    fn snippet_truncates_long_bodies() {
        let long = "x".repeat(10_000);
        assert_eq!(snippet(&long).len(), BODY_SNIPPET_LEN);
        assert_eq!(snippet("short"), "short");
    }
}
