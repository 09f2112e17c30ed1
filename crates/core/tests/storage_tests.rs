// ═══════════════════════════════════════════════════════════════════
// Storage Tests — JSON round-trips, injected store, file persistence
// ═══════════════════════════════════════════════════════════════════

use chrono::{NaiveDate, Utc};

use divitrack_core::errors::CoreError;
use divitrack_core::models::holding::Holding;
use divitrack_core::models::portfolio::Portfolio;
use divitrack_core::storage::manager::StorageManager;
use divitrack_core::storage::store::{MemoryStore, PortfolioStore};
use divitrack_core::DividendTracker;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn sample_tracker() -> DividendTracker {
    let mut tracker = DividendTracker::create_new();
    tracker
        .add_holding("SCHD", "Schwab US Dividend Equity ETF", "Dividend Equity", 150.0, 75.20, d(2024, 3, 1))
        .unwrap();
    tracker
        .add_holding("SPY", "SPDR S&P 500", "Large Blend", 25.0, 425.30, d(2024, 1, 10))
        .unwrap();
    tracker
}

// ═══════════════════════════════════════════════════════════════════
//  StorageManager
// ═══════════════════════════════════════════════════════════════════

mod manager {
    use super::*;

    #[test]
    fn json_roundtrip_preserves_portfolio() {
        let mut portfolio = Portfolio::default();
        let holding = Holding::new("SCHD", "Schwab Dividend", "Dividend Equity", 150.0, 75.20, d(2024, 3, 1));
        portfolio.holdings.insert(holding.symbol.clone(), holding.clone());
        portfolio.last_refresh = Some(Utc::now());

        let json = StorageManager::to_json(&portfolio).unwrap();
        let back = StorageManager::from_json(&json).unwrap();

        assert_eq!(back.holdings.len(), 1);
        assert_eq!(back.holdings["SCHD"], holding);
        assert_eq!(back.last_refresh, portfolio.last_refresh);
        assert_eq!(back.settings, portfolio.settings);
    }

    #[test]
    fn output_is_plain_key_value_json() {
        let mut portfolio = Portfolio::default();
        let holding = Holding::new("SPY", "SPDR S&P 500", "Large Blend", 10.0, 500.0, d(2024, 3, 15));
        portfolio.holdings.insert(holding.symbol.clone(), holding);

        let json = StorageManager::to_json(&portfolio).unwrap();
        // Dates as ISO-8601 strings, fields addressable by name
        assert!(json.contains("\"purchase_date\": \"2024-03-15\""));
        assert!(json.contains("\"symbol\": \"SPY\""));
    }

    #[test]
    fn malformed_json_is_a_deserialization_error() {
        let err = StorageManager::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Injected store
// ═══════════════════════════════════════════════════════════════════

mod store {
    use super::*;

    #[test]
    fn empty_store_yields_fresh_portfolio() {
        let store = MemoryStore::new();
        let tracker = DividendTracker::load_from_store(&store).unwrap();
        assert_eq!(tracker.holding_count(), 0);
        assert!(!tracker.has_unsaved_changes());
    }

    #[test]
    fn save_and_reload_through_store() {
        let mut store = MemoryStore::new();
        let mut tracker = sample_tracker();

        tracker.save_to_store(&mut store).unwrap();
        assert!(!tracker.has_unsaved_changes());

        let reloaded = DividendTracker::load_from_store(&store).unwrap();
        assert_eq!(reloaded.holding_count(), 2);
        assert_eq!(reloaded.transaction_count(), 2);

        let schd = reloaded.get_holding("SCHD").unwrap();
        assert!((schd.cost_basis - 11280.0).abs() < 1e-9);
    }

    #[test]
    fn store_contents_are_replaced_on_save() {
        let mut store = MemoryStore::new();
        let mut tracker = sample_tracker();
        tracker.save_to_store(&mut store).unwrap();

        tracker.remove_holding("SPY").unwrap();
        tracker.save_to_store(&mut store).unwrap();

        let reloaded = DividendTracker::load_from_store(&store).unwrap();
        assert_eq!(reloaded.holding_count(), 1);
        // Audit trail survives the removal
        assert_eq!(reloaded.transaction_count(), 2);
    }

    #[test]
    fn memory_store_load_returns_saved_document() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save("{}").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("{}"));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  File persistence (native)
// ═══════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
mod files {
    use super::*;

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        let path = path.to_str().unwrap();

        let mut tracker = sample_tracker();
        tracker.save_to_file(path).unwrap();
        assert!(!tracker.has_unsaved_changes());

        let reloaded = DividendTracker::load_from_file(path).unwrap();
        assert_eq!(reloaded.holding_count(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DividendTracker::load_from_file("/nonexistent/portfolio.json").unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}
