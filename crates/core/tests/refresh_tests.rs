// ═══════════════════════════════════════════════════════════════════
// Refresh Tests — cooldown gate, batch refresh, rate limiter
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::time::Duration as StdDuration;
use std::time::Instant;

use divitrack_core::errors::CoreError;
use divitrack_core::models::fund::{Frequency, Fund};
use divitrack_core::models::portfolio::Portfolio;
use divitrack_core::providers::rate_limit::SlidingWindowLimiter;
use divitrack_core::providers::traits::{FundDataProvider, TickerMatch};
use divitrack_core::services::refresh_service::RefreshService;
use divitrack_core::DividendTracker;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Mock Provider
// ═══════════════════════════════════════════════════════════════════

struct MockFundProvider {
    funds: HashMap<String, Fund>,
    failing: HashSet<String>,
}

impl MockFundProvider {
    fn new(funds: Vec<Fund>) -> Self {
        Self {
            funds: funds.into_iter().map(|f| (f.symbol.clone(), f)).collect(),
            failing: HashSet::new(),
        }
    }

    fn failing_on(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_uppercase());
        self
    }
}

#[async_trait]
impl FundDataProvider for MockFundProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    async fn fetch_fund(&self, symbol: &str) -> Result<Fund, CoreError> {
        let key = symbol.to_uppercase();
        if self.failing.contains(&key) {
            return Err(CoreError::Api {
                provider: "MockProvider".into(),
                message: format!("simulated outage for {key}"),
            });
        }
        self.funds.get(&key).cloned().ok_or(CoreError::Api {
            provider: "MockProvider".into(),
            message: format!("unknown symbol {key}"),
        })
    }

    async fn search(&self, _query: &str) -> Result<Vec<TickerMatch>, CoreError> {
        Ok(Vec::new())
    }
}

fn schd() -> Fund {
    Fund::new(
        "SCHD",
        "Schwab US Dividend Equity ETF",
        78.50,
        0.74,
        Some(d(2024, 3, 25)),
        Frequency::Quarterly,
        "Dividend Equity",
    )
}

fn spy() -> Fund {
    Fund::new("SPY", "SPDR S&P 500", 450.0, 1.60, Some(d(2024, 3, 15)), Frequency::Quarterly, "Large Blend")
}

// ═══════════════════════════════════════════════════════════════════
//  Cooldown gate
// ═══════════════════════════════════════════════════════════════════

mod gate {
    use super::*;

    #[test]
    fn fresh_portfolio_is_ready() {
        let svc = RefreshService::new();
        let portfolio = Portfolio::default();
        assert!(svc.can_refresh(&portfolio));
        assert!(svc.time_until_ready(&portfolio).is_zero());
    }

    #[test]
    fn closed_at_twenty_three_hours() {
        let svc = RefreshService::new();
        let mut portfolio = Portfolio::default();
        portfolio.last_refresh = Some(Utc::now() - Duration::hours(23));

        assert!(!svc.can_refresh(&portfolio));
        let remaining = svc.time_until_ready(&portfolio);
        assert!(remaining > Duration::minutes(55));
        assert!(remaining <= Duration::hours(1));
    }

    #[test]
    fn open_at_twenty_five_hours() {
        let svc = RefreshService::new();
        let mut portfolio = Portfolio::default();
        portfolio.last_refresh = Some(Utc::now() - Duration::hours(25));

        assert!(svc.can_refresh(&portfolio));
        assert!(svc.time_until_ready(&portfolio).is_zero());
    }

    #[tokio::test]
    async fn refresh_while_gated_is_rejected() {
        let svc = RefreshService::new();
        let mut portfolio = Portfolio::default();
        let before = Utc::now() - Duration::hours(2);
        portfolio.last_refresh = Some(before);

        let provider = MockFundProvider::new(vec![schd()]);
        let err = svc
            .perform_refresh(&mut portfolio, &provider, &["SCHD".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::CooldownActive { .. }));
        // Rejection does not touch the stamp
        assert_eq!(portfolio.last_refresh, Some(before));
    }

    #[test]
    fn format_wait_variants() {
        assert_eq!(RefreshService::format_wait(Duration::zero()), "Available now");
        assert_eq!(RefreshService::format_wait(Duration::minutes(90)), "1h 30m");
        assert_eq!(RefreshService::format_wait(Duration::minutes(45)), "45m");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  perform_refresh
// ═══════════════════════════════════════════════════════════════════

mod refresh {
    use super::*;

    #[tokio::test]
    async fn success_stamps_the_cooldown() {
        let svc = RefreshService::new();
        let mut portfolio = Portfolio::default();
        let provider = MockFundProvider::new(vec![schd()]);

        let report = svc
            .perform_refresh(&mut portfolio, &provider, &["SCHD".to_string()])
            .await
            .unwrap();

        assert_eq!(report.updated.len(), 1);
        assert!(report.failures.is_empty());
        assert_eq!(portfolio.last_refresh, Some(report.refreshed_at));
        assert!(!svc.can_refresh(&portfolio));
    }

    #[tokio::test]
    async fn total_failure_leaves_stamp_unchanged() {
        let svc = RefreshService::new();
        let mut portfolio = Portfolio::default();
        let provider = MockFundProvider::new(vec![]).failing_on("SCHD");

        let err = svc
            .perform_refresh(&mut portfolio, &provider, &["SCHD".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Api { .. }));
        // Failure must not burn the daily quota — retries stay permitted
        assert!(portfolio.last_refresh.is_none());
        assert!(svc.can_refresh(&portfolio));
    }

    #[tokio::test]
    async fn partial_failure_is_accumulated_not_fatal() {
        let svc = RefreshService::new();
        let mut portfolio = Portfolio::default();
        let provider = MockFundProvider::new(vec![schd(), spy()]).failing_on("SPY");

        let report = svc
            .perform_refresh(
                &mut portfolio,
                &provider,
                &["SCHD".to_string(), "SPY".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.updated[0].symbol, "SCHD");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].symbol, "SPY");
        assert!(report.failures[0].reason.contains("simulated outage"));
        // One success is enough to commit the transition
        assert!(portfolio.last_refresh.is_some());
    }

    #[tokio::test]
    async fn empty_symbol_list_still_commits() {
        let svc = RefreshService::new();
        let mut portfolio = Portfolio::default();
        let provider = MockFundProvider::new(vec![]);

        let report = svc.perform_refresh(&mut portfolio, &provider, &[]).await.unwrap();
        assert!(report.updated.is_empty());
        assert!(portfolio.last_refresh.is_some());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Facade refresh
// ═══════════════════════════════════════════════════════════════════

mod facade {
    use super::*;

    #[tokio::test]
    async fn refresh_folds_funds_into_cache() {
        let mut tracker = DividendTracker::create_new();
        tracker
            .add_holding("SCHD", "Schwab Dividend", "Dividend Equity", 150.0, 75.20, d(2024, 3, 1))
            .unwrap();
        tracker
            .add_holding("SPY", "SPDR S&P 500", "Large Blend", 25.0, 425.30, d(2024, 1, 10))
            .unwrap();

        let provider = MockFundProvider::new(vec![schd(), spy()]);
        let report = tracker.refresh_funds(&provider).await.unwrap();

        assert_eq!(report.updated.len(), 2);
        assert!(tracker.get_fund("SCHD").is_some());
        assert!(tracker.get_fund("SPY").is_some());
        assert!(tracker.last_refresh().is_some());
        assert!(!tracker.can_refresh());
        assert!(tracker.has_unsaved_changes());
    }

    #[tokio::test]
    async fn second_refresh_hits_the_gate() {
        let mut tracker = DividendTracker::create_new();
        tracker
            .add_holding("SCHD", "Schwab Dividend", "Dividend Equity", 150.0, 75.20, d(2024, 3, 1))
            .unwrap();

        let provider = MockFundProvider::new(vec![schd()]);
        tracker.refresh_funds(&provider).await.unwrap();

        let err = tracker.refresh_funds(&provider).await.unwrap_err();
        assert!(matches!(err, CoreError::CooldownActive { .. }));
        assert_ne!(tracker.refresh_wait_message(), "Available now");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  SlidingWindowLimiter
// ═══════════════════════════════════════════════════════════════════

mod rate_limit {
    use super::*;

    #[test]
    fn allows_calls_under_the_cap() {
        let mut limiter = SlidingWindowLimiter::new(3, StdDuration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.can_call(t0));
        limiter.record(t0);
        limiter.record(t0 + StdDuration::from_secs(1));
        assert!(limiter.can_call(t0 + StdDuration::from_secs(2)));
    }

    #[test]
    fn reports_wait_once_window_is_full() {
        let mut limiter = SlidingWindowLimiter::new(3, StdDuration::from_secs(60));
        let t0 = Instant::now();

        limiter.record(t0);
        limiter.record(t0 + StdDuration::from_secs(1));
        limiter.record(t0 + StdDuration::from_secs(2));

        // Window full; the oldest call ages out 60s after t0
        let wait = limiter.wait_time(t0 + StdDuration::from_secs(3));
        assert_eq!(wait, StdDuration::from_secs(57));
        assert!(!limiter.can_call(t0 + StdDuration::from_secs(3)));
    }

    #[test]
    fn expired_timestamps_fall_out_of_the_window() {
        let mut limiter = SlidingWindowLimiter::new(3, StdDuration::from_secs(60));
        let t0 = Instant::now();

        limiter.record(t0);
        limiter.record(t0 + StdDuration::from_secs(1));
        limiter.record(t0 + StdDuration::from_secs(2));

        assert!(limiter.can_call(t0 + StdDuration::from_secs(61)));
        assert_eq!(limiter.recent_calls(), 2);
    }

    #[test]
    fn polygon_starter_caps_at_five_per_minute() {
        let mut limiter = SlidingWindowLimiter::polygon_starter();
        let t0 = Instant::now();

        for i in 0..5 {
            assert!(limiter.can_call(t0 + StdDuration::from_secs(i)));
            limiter.record(t0 + StdDuration::from_secs(i));
        }
        assert!(!limiter.can_call(t0 + StdDuration::from_secs(5)));
    }
}
