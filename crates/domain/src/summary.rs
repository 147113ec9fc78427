use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub blocked: u64,
    pub allowed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedDomain {
    pub name: String,
    pub count: u64,
}

/// Aggregated activity for one range. Derived once per aggregation run and
/// never mutated in place afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Blocked destinations ranked by frequency, keyed by the full name as
    /// reported upstream.
    pub top_blocked: Vec<BlockedDomain>,

    /// The same ranking rolled up to the last two DNS labels. A naive
    /// public-suffix approximation that misclassifies multi-label suffixes
    /// such as "co.uk"; kept as a documented limitation.
    #[serde(default)]
    pub top_blocked_roots: Vec<BlockedDomain>,

    pub totals: Totals,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.totals.blocked == 0 && self.totals.allowed == 0
    }
}
