use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

/// A normalized log timestamp: millisecond epoch, or explicitly unknown.
///
/// Upstream records carry timestamps in several shapes (epoch seconds, epoch
/// milliseconds, ISO strings). Everything is reduced to one representation;
/// `Unknown` is a first-class outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTimestamp {
    Millis(i64),
    Unknown,
}

impl LogTimestamp {
    pub fn millis(&self) -> Option<i64> {
        match self {
            LogTimestamp::Millis(ms) => Some(*ms),
            LogTimestamp::Unknown => None,
        }
    }
}

/// Epoch values at or above this are already milliseconds; below, seconds.
/// 10^12 ms is 2001-09-09, 10^12 s is ~33658 AD, so the split is unambiguous
/// for gateway logs.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Normalize one timestamp value of unknown shape.
pub fn normalize(value: &Value) -> LogTimestamp {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(normalize_epoch)
            .unwrap_or(LogTimestamp::Unknown),
        Value::String(s) => normalize_str(s),
        _ => LogTimestamp::Unknown,
    }
}

fn normalize_epoch(raw: i64) -> LogTimestamp {
    if raw <= 0 {
        return LogTimestamp::Unknown;
    }
    if raw >= MILLIS_THRESHOLD {
        LogTimestamp::Millis(raw)
    } else {
        LogTimestamp::Millis(raw * 1000)
    }
}

fn normalize_str(s: &str) -> LogTimestamp {
    let s = s.trim();
    if s.is_empty() {
        return LogTimestamp::Unknown;
    }
    if let Ok(raw) = s.parse::<i64>() {
        return normalize_epoch(raw);
    }
    if let Ok(raw) = s.parse::<f64>() {
        return normalize_epoch(raw as i64);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return LogTimestamp::Millis(dt.timestamp_millis());
    }
    // ISO without offset ("2024-05-01 12:30:00" / "2024-05-01T12:30:00")
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return LogTimestamp::Millis(dt.and_utc().timestamp_millis());
        }
    }
    LogTimestamp::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn epoch_seconds_become_millis() {
        assert_eq!(
            normalize(&json!(1_700_000_000)),
            LogTimestamp::Millis(1_700_000_000_000)
        );
    }

    #[test]
    fn epoch_millis_pass_through() {
        assert_eq!(
            normalize(&json!(1_700_000_000_123i64)),
            LogTimestamp::Millis(1_700_000_000_123)
        );
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(
            normalize(&json!("1700000000")),
            LogTimestamp::Millis(1_700_000_000_000)
        );
    }

    #[test]
    fn rfc3339_strings_are_parsed() {
        let ts = normalize(&json!("2023-11-14T22:13:20Z"));
        assert_eq!(ts, LogTimestamp::Millis(1_700_000_000_000));
    }

    #[test]
    fn naive_iso_strings_are_parsed() {
        assert!(matches!(
            normalize(&json!("2023-11-14 22:13:20")),
            LogTimestamp::Millis(_)
        ));
    }

    #[test]
    fn garbage_is_unknown() {
        assert_eq!(normalize(&json!("soon")), LogTimestamp::Unknown);
        assert_eq!(normalize(&json!(null)), LogTimestamp::Unknown);
        assert_eq!(normalize(&json!(-5)), LogTimestamp::Unknown);
        assert_eq!(normalize(&json!({"t": 1})), LogTimestamp::Unknown);
    }
}
