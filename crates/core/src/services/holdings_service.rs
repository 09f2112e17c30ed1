use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::holding::{Holding, Transaction};
use crate::models::portfolio::Portfolio;

/// Manages the holdings ledger: one position per symbol, merged by
/// weighted-average cost, with an append-only transaction history.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct HoldingsService;

impl HoldingsService {
    pub fn new() -> Self {
        Self
    }

    /// Record a purchase: append one Buy transaction, then create the position
    /// or merge the lot into the existing one.
    ///
    /// Returns the resulting position state and the transaction record.
    /// Exactly one transaction is created per call, merge or not.
    pub fn add_purchase(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
        name: &str,
        sector: &str,
        shares: f64,
        price_per_share: f64,
        date: NaiveDate,
    ) -> Result<(Holding, Transaction), CoreError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(CoreError::Validation(
                "Symbol must not be empty".into(),
            ));
        }
        if !(shares > 0.0 && shares.is_finite()) {
            return Err(CoreError::Validation(format!(
                "Share count must be positive, got {shares}"
            )));
        }
        if !(price_per_share > 0.0 && price_per_share.is_finite()) {
            return Err(CoreError::Validation(format!(
                "Price per share must be positive, got {price_per_share}"
            )));
        }

        let transaction = Transaction::buy(&symbol, name, shares, price_per_share, date);
        // Transaction history is displayed newest-first, so prepend.
        portfolio.transactions.insert(0, transaction.clone());

        let holding = portfolio
            .holdings
            .entry(symbol.clone())
            .and_modify(|existing| existing.merge_purchase(shares, price_per_share, date))
            .or_insert_with(|| {
                Holding::new(&symbol, name, sector, shares, price_per_share, date)
            });

        Ok((holding.clone(), transaction))
    }

    /// Delete a position. The transaction history is permanent and stays.
    pub fn remove_holding(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
    ) -> Result<Holding, CoreError> {
        let key = symbol.trim().to_uppercase();
        portfolio
            .holdings
            .remove(&key)
            .ok_or(CoreError::HoldingNotFound(key))
    }

    /// Remove every position, keeping the transaction history intact.
    pub fn clear_positions(&self, portfolio: &mut Portfolio) {
        portfolio.holdings.clear();
    }

    /// Remove every position AND the transaction history — a full wipe.
    pub fn clear_all(&self, portfolio: &mut Portfolio) {
        portfolio.holdings.clear();
        portfolio.transactions.clear();
    }

    /// All positions in deterministic order (sorted by symbol).
    pub fn holdings_sorted<'a>(&self, portfolio: &'a Portfolio) -> Vec<&'a Holding> {
        let mut holdings: Vec<&Holding> = portfolio.holdings.values().collect();
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        holdings
    }

    /// Transaction history for one symbol (case-insensitive), newest first —
    /// consistent with the full history's ordering.
    pub fn transactions_for<'a>(
        &self,
        portfolio: &'a Portfolio,
        symbol: &str,
    ) -> Vec<&'a Transaction> {
        let key = symbol.trim().to_uppercase();
        portfolio
            .transactions
            .iter()
            .filter(|t| t.symbol == key)
            .collect()
    }
}

impl Default for HoldingsService {
    fn default() -> Self {
        Self::new()
    }
}
