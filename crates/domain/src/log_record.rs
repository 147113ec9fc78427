use crate::timestamp::{self, LogTimestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names tried, in order, for each concept the pipeline reads from an
/// otherwise opaque upstream record.
const TIMESTAMP_FIELDS: [&str; 5] = ["timestamp", "ts", "time", "datetime", "date"];
const ACTION_FIELDS: [&str; 4] = ["action", "decision", "verdict", "policy_action"];
const DESTINATION_FIELDS: [&str; 5] = ["query", "domain", "name", "hostname", "destination"];

/// One raw gateway log record. The upstream schema is not enforced; a fixed
/// set of optional fields is read best-effort and everything else is carried
/// through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(pub Value);

impl LogRecord {
    fn first_field(&self, candidates: &[&str]) -> Option<&Value> {
        let obj = self.0.as_object()?;
        candidates.iter().find_map(|name| obj.get(*name))
    }

    /// Normalized event time, trying each candidate field until one parses.
    pub fn timestamp(&self) -> LogTimestamp {
        let obj = match self.0.as_object() {
            Some(obj) => obj,
            None => return LogTimestamp::Unknown,
        };
        for name in TIMESTAMP_FIELDS {
            if let Some(value) = obj.get(name) {
                if let LogTimestamp::Millis(ms) = timestamp::normalize(value) {
                    return LogTimestamp::Millis(ms);
                }
            }
        }
        LogTimestamp::Unknown
    }

    pub fn timestamp_ms(&self) -> Option<i64> {
        self.timestamp().millis()
    }

    /// Blocked-event predicate: any classification value containing "block"
    /// (`dns_block`, `tls_block`, `blocked`, ...).
    pub fn is_blocked(&self) -> bool {
        self.first_field(&ACTION_FIELDS)
            .and_then(Value::as_str)
            .map(|action| action.to_ascii_lowercase().contains("block"))
            .unwrap_or(false)
    }

    /// Destination identifier as reported upstream.
    pub fn destination(&self) -> Option<&str> {
        self.first_field(&DESTINATION_FIELDS)
            .and_then(Value::as_str)
            .map(|s| s.trim_end_matches('.'))
            .filter(|s| !s.is_empty())
    }

    /// Destination reduced to its last two DNS labels ("cdn.ads.example.com"
    /// -> "example.com"). A naive public-suffix approximation: multi-label
    /// suffixes such as "co.uk" are collapsed too aggressively. Known
    /// limitation, kept intentionally.
    pub fn base_domain(&self) -> Option<String> {
        let dest = self.destination()?.to_ascii_lowercase();
        let labels: Vec<&str> = dest.split('.').filter(|l| !l.is_empty()).collect();
        match labels.len() {
            0 => None,
            1 => Some(labels[0].to_string()),
            n => Some(format!("{}.{}", labels[n - 2], labels[n - 1])),
        }
    }
}
