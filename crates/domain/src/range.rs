use serde::Serialize;

/// A user-selectable time range for the activity dashboard.
///
/// `days = None` means unbounded, most-recent-first semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub days: Option<u32>,
}

/// Known ranges in fixed rotation order. The prefetch scheduler walks this
/// table; every runtime range key resolves to exactly one entry (unknown
/// keys fall back to [`DEFAULT_RANGE`]).
pub const RANGES: [RangeDescriptor; 5] = [
    RangeDescriptor {
        key: "24h",
        label: "Last 24 hours",
        days: Some(1),
    },
    RangeDescriptor {
        key: "7d",
        label: "Last 7 days",
        days: Some(7),
    },
    RangeDescriptor {
        key: "30d",
        label: "Last 30 days",
        days: Some(30),
    },
    RangeDescriptor {
        key: "90d",
        label: "Last 90 days",
        days: Some(90),
    },
    RangeDescriptor {
        key: "lifetime",
        label: "Lifetime",
        days: None,
    },
];

pub const DEFAULT_RANGE: &str = "7d";

/// Effective range used when the requested range yielded no data and the
/// collector fell back to an unbounded "most recent records" query. Not part
/// of the rotation.
pub const LATEST: RangeDescriptor = RangeDescriptor {
    key: "latest",
    label: "Latest available",
    days: None,
};

/// Resolve a range key to its descriptor, falling back to the default for
/// unknown keys.
pub fn resolve(key: &str) -> &'static RangeDescriptor {
    if key == LATEST.key {
        return &LATEST;
    }
    RANGES
        .iter()
        .find(|r| r.key == key)
        .unwrap_or_else(|| resolve(DEFAULT_RANGE))
}
