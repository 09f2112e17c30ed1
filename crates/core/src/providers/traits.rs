use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::fund::Fund;

/// A ticker search hit, trimmed to what the search UI needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMatch {
    pub symbol: String,
    pub name: String,
}

/// Trait abstraction for market-data providers.
///
/// The refresh pipeline only ever talks to this trait — the concrete API
/// behind it (Polygon today) can be swapped or mocked without touching the
/// rest of the codebase.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FundDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch a complete fund snapshot: price, dividend history-derived
    /// cadence, last ex-date, name, and sector.
    async fn fetch_fund(&self, symbol: &str) -> Result<Fund, CoreError>;

    /// Search for fund tickers matching a query string.
    async fn search(&self, query: &str) -> Result<Vec<TickerMatch>, CoreError>;
}
