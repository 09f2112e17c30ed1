pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;

use models::{
    dividend::{DividendEvent, UpcomingDividends},
    fund::Fund,
    holding::{Holding, Transaction},
    portfolio::Portfolio,
    refresh::RefreshReport,
    settings::Settings,
    valuation::PortfolioSummary,
};
use providers::traits::FundDataProvider;
use services::{
    dividend_service::DividendService, holdings_service::HoldingsService,
    refresh_service::RefreshService, valuation_service::ValuationService,
};
use storage::manager::StorageManager;
use storage::store::PortfolioStore;

use errors::CoreError;

/// Maximum configurable projection horizon in days (1 year).
const MAX_HORIZON_DAYS: i64 = 365;

/// Main entry point for the DiviTrack core library.
/// Holds the portfolio, the in-memory fund cache, and all services
/// needed to operate on them.
#[must_use]
pub struct DividendTracker {
    portfolio: Portfolio,
    /// Latest fund snapshots keyed by symbol; replaced wholesale on refresh.
    funds: HashMap<String, Fund>,
    holdings_service: HoldingsService,
    dividend_service: DividendService,
    valuation_service: ValuationService,
    refresh_service: RefreshService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for DividendTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DividendTracker")
            .field("holdings", &self.portfolio.holdings.len())
            .field("transactions", &self.portfolio.transactions.len())
            .field("cached_funds", &self.funds.len())
            .field("last_refresh", &self.portfolio.last_refresh)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl DividendTracker {
    /// Create a brand new empty portfolio with default settings.
    pub fn create_new() -> Self {
        Self::build(Portfolio::default())
    }

    /// Load an existing portfolio from its JSON representation.
    pub fn load_from_json(json: &str) -> Result<Self, CoreError> {
        let portfolio = StorageManager::from_json(json)?;
        Ok(Self::build(portfolio))
    }

    /// Serialize the current portfolio to JSON for external persistence.
    /// Clears the unsaved-changes flag on success.
    pub fn to_json(&mut self) -> Result<String, CoreError> {
        let json = StorageManager::to_json(&self.portfolio)?;
        self.dirty = false;
        Ok(json)
    }

    /// Load from an injected store. An empty store yields a fresh portfolio.
    pub fn load_from_store(store: &dyn PortfolioStore) -> Result<Self, CoreError> {
        match store.load()? {
            Some(json) => Self::load_from_json(&json),
            None => Ok(Self::create_new()),
        }
    }

    /// Save to an injected store. Clears the unsaved-changes flag on success.
    pub fn save_to_store(&mut self, store: &mut dyn PortfolioStore) -> Result<(), CoreError> {
        let json = StorageManager::to_json(&self.portfolio)?;
        store.save(&json)?;
        self.dirty = false;
        Ok(())
    }

    /// Load from a JSON file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let portfolio = StorageManager::load_from_file(path)?;
        Ok(Self::build(portfolio))
    }

    /// Save to a JSON file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.portfolio, path)?;
        self.dirty = false;
        Ok(())
    }

    // ── Holdings Management ─────────────────────────────────────────

    /// Record a purchase of a fund. Creates the position on first purchase;
    /// subsequent purchases of the same symbol merge by weighted-average
    /// cost. Always appends exactly one Buy transaction.
    /// Returns the transaction's id.
    pub fn add_holding(
        &mut self,
        symbol: &str,
        name: &str,
        sector: &str,
        shares: f64,
        price_per_share: f64,
        date: NaiveDate,
    ) -> Result<uuid::Uuid, CoreError> {
        let (_, transaction) = self.holdings_service.add_purchase(
            &mut self.portfolio,
            symbol,
            name,
            sector,
            shares,
            price_per_share,
            date,
        )?;
        self.dirty = true;
        Ok(transaction.id)
    }

    /// Remove a position. The transaction history stays — the audit trail
    /// is permanent. Returns the removed position.
    pub fn remove_holding(&mut self, symbol: &str) -> Result<Holding, CoreError> {
        let removed = self
            .holdings_service
            .remove_holding(&mut self.portfolio, symbol)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Remove all positions, keeping the transaction history.
    pub fn clear_positions(&mut self) {
        if !self.portfolio.holdings.is_empty() {
            self.holdings_service.clear_positions(&mut self.portfolio);
            self.dirty = true;
        }
    }

    /// Remove all positions and the entire transaction history.
    pub fn clear_all(&mut self) {
        if !self.portfolio.holdings.is_empty() || !self.portfolio.transactions.is_empty() {
            self.holdings_service.clear_all(&mut self.portfolio);
            self.dirty = true;
        }
    }

    /// Get a single position by symbol (case-insensitive).
    #[must_use]
    pub fn get_holding(&self, symbol: &str) -> Option<&Holding> {
        self.portfolio.holdings.get(&symbol.trim().to_uppercase())
    }

    /// All positions in deterministic order (sorted by symbol).
    #[must_use]
    pub fn get_holdings(&self) -> Vec<&Holding> {
        self.holdings_service.holdings_sorted(&self.portfolio)
    }

    /// Number of open positions.
    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.portfolio.holdings.len()
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Full purchase history, newest first.
    #[must_use]
    pub fn get_transactions(&self) -> &[Transaction] {
        &self.portfolio.transactions
    }

    /// Purchase history for one symbol (case-insensitive), newest first.
    #[must_use]
    pub fn get_transactions_for(&self, symbol: &str) -> Vec<&Transaction> {
        self.holdings_service
            .transactions_for(&self.portfolio, symbol)
    }

    /// Total number of recorded transactions.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.portfolio.transactions.len()
    }

    // ── Fund Cache ──────────────────────────────────────────────────

    /// Replace the entire fund cache (e.g., after an external bulk fetch).
    pub fn set_funds(&mut self, funds: Vec<Fund>) {
        self.funds = funds.into_iter().map(|f| (f.symbol.clone(), f)).collect();
    }

    /// Insert or replace a single fund snapshot.
    pub fn upsert_fund(&mut self, fund: Fund) {
        self.funds.insert(fund.symbol.clone(), fund);
    }

    /// Get a cached fund snapshot by symbol (case-insensitive).
    #[must_use]
    pub fn get_fund(&self, symbol: &str) -> Option<&Fund> {
        self.funds.get(&symbol.trim().to_uppercase())
    }

    /// All cached funds in deterministic order (sorted by symbol).
    #[must_use]
    pub fn get_funds(&self) -> Vec<&Fund> {
        let mut funds: Vec<&Fund> = self.funds.values().collect();
        funds.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        funds
    }

    // ── Upcoming Dividends ──────────────────────────────────────────

    /// Project upcoming dividend payments within the configured horizon,
    /// sorted ascending by ex-date.
    #[must_use]
    pub fn upcoming_dividends(&self) -> Vec<DividendEvent> {
        self.upcoming_dividends_within(self.portfolio.settings.horizon_days)
    }

    /// Project upcoming dividend payments within an explicit horizon.
    #[must_use]
    pub fn upcoming_dividends_within(&self, horizon_days: i64) -> Vec<DividendEvent> {
        let today = Utc::now().date_naive();
        self.dividend_service
            .upcoming(&self.portfolio, &self.funds, today, horizon_days)
    }

    /// Projected payments plus summary statistics for the dashboard.
    #[must_use]
    pub fn upcoming_dividends_with_stats(&self) -> UpcomingDividends {
        let today = Utc::now().date_naive();
        self.dividend_service.upcoming_with_stats(
            &self.portfolio,
            &self.funds,
            today,
            self.portfolio.settings.horizon_days,
        )
    }

    /// Month calendar of projected ex- and pay-dates.
    #[must_use]
    pub fn dividend_calendar(
        &self,
        year: i32,
        month: u32,
    ) -> std::collections::BTreeMap<u32, models::dividend::CalendarDay> {
        let events = self.upcoming_dividends();
        self.dividend_service.calendar(&events, year, month)
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Value every position against the cached fund quotes, as of today.
    #[must_use]
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        let today = Utc::now().date_naive();
        self.valuation_service
            .summarize(&self.portfolio, &self.funds, today)
    }

    // ── Data Refresh ────────────────────────────────────────────────

    /// Whether the 24-hour refresh gate is currently open.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_service.can_refresh(&self.portfolio)
    }

    /// Remaining wait until the gate reopens; zero when already open.
    #[must_use]
    pub fn time_until_refresh(&self) -> Duration {
        self.refresh_service.time_until_ready(&self.portfolio)
    }

    /// Human-readable wait ("23h 12m", "Available now") for display.
    #[must_use]
    pub fn refresh_wait_message(&self) -> String {
        RefreshService::format_wait(self.time_until_refresh())
    }

    /// When fund data was last successfully refreshed, if ever.
    #[must_use]
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.portfolio.last_refresh
    }

    /// Refresh fund data for every held symbol through the injected
    /// provider. Fails with `CooldownActive` while the gate is closed;
    /// otherwise fetches each symbol, folds the fresh snapshots into the
    /// fund cache, and stamps the cooldown. Per-symbol failures are listed
    /// in the report rather than aborting the batch.
    pub async fn refresh_funds(
        &mut self,
        provider: &dyn FundDataProvider,
    ) -> Result<RefreshReport, CoreError> {
        let mut symbols: Vec<String> = self.portfolio.holdings.keys().cloned().collect();
        symbols.sort();

        let report = self
            .refresh_service
            .perform_refresh(&mut self.portfolio, provider, &symbols)
            .await?;

        for fund in &report.updated {
            self.funds.insert(fund.symbol.clone(), fund.clone());
        }
        self.dirty = true;

        Ok(report)
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Get current settings.
    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.portfolio.settings
    }

    /// Set the projection horizon for upcoming-dividend queries.
    pub fn set_horizon_days(&mut self, days: i64) -> Result<(), CoreError> {
        if !(1..=MAX_HORIZON_DAYS).contains(&days) {
            return Err(CoreError::Validation(format!(
                "Projection horizon must be between 1 and {MAX_HORIZON_DAYS} days, got {days}"
            )));
        }
        self.portfolio.settings.horizon_days = days;
        self.dirty = true;
        Ok(())
    }

    /// Set an API key for a provider (e.g., "polygon").
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.portfolio.settings.api_keys.insert(provider, key);
        self.dirty = true;
    }

    /// Remove an API key for a provider.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.portfolio.settings.api_keys.remove(provider).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Returns `true` if the portfolio has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(portfolio: Portfolio) -> Self {
        Self {
            portfolio,
            funds: HashMap::new(),
            holdings_service: HoldingsService::new(),
            dividend_service: DividendService::new(),
            valuation_service: ValuationService::new(),
            refresh_service: RefreshService::new(),
            dirty: false,
        }
    }
}
