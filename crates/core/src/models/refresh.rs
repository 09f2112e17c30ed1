use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fund::Fund;

/// One symbol that failed during a batch refresh. The rest of the batch
/// proceeds regardless — one symbol's failure must not sink the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshFailure {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of one refresh pass over the held symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshReport {
    /// When the refresh was committed (also stamped on the portfolio)
    pub refreshed_at: DateTime<Utc>,

    /// Fresh fund snapshots, in fetch order
    pub updated: Vec<Fund>,

    /// Per-symbol failures accumulated during the batch
    pub failures: Vec<RefreshFailure>,
}
