use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default projection horizon for upcoming-dividend queries.
pub const DEFAULT_HORIZON_DAYS: i64 = 90;

/// User-configurable settings, persisted inside the portfolio JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// How far ahead upcoming-dividend projections look, in days.
    pub horizon_days: i64,

    /// Optional API keys for market-data providers that require them.
    /// Keys: provider name (e.g., "polygon"). Values: the API key string.
    pub api_keys: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            api_keys: HashMap::new(),
        }
    }
}
