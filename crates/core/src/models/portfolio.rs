use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::holding::{Holding, Transaction};
use super::settings::Settings;

/// The main data container. Everything in here serializes losslessly to
/// plain JSON (dates as ISO-8601 strings, numbers as doubles) so an external
/// persistence collaborator can store it anywhere.
///
/// Contains: the holdings ledger (one position per symbol), the append-only
/// transaction history, user settings, and the refresh-gate timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    /// Current positions, keyed by uppercased symbol.
    /// Key uniqueness is the ledger's central invariant.
    pub holdings: HashMap<String, Holding>,

    /// Purchase history, newest first. Append-only — removing or clearing
    /// positions never touches this list.
    pub transactions: Vec<Transaction>,

    /// User settings (projection horizon, API keys).
    pub settings: Settings,

    /// When fund data was last successfully refreshed. Absent until the
    /// first successful refresh; read by the refresh gate on every attempt.
    #[serde(default)]
    pub last_refresh: Option<DateTime<Utc>>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            holdings: HashMap::new(),
            transactions: Vec::new(),
            settings: Settings::default(),
            last_refresh: None,
        }
    }
}
