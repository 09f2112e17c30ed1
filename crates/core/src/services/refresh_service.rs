use chrono::{Duration, Utc};

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::refresh::{RefreshFailure, RefreshReport};
use crate::providers::traits::FundDataProvider;

/// Minimum spacing between successful refreshes.
pub const REFRESH_COOLDOWN_HOURS: i64 = 24;

/// Cooldown gate guarding external data refreshes.
///
/// Two states, Ready ⇄ Cooldown, evaluated lazily against the portfolio's
/// `last_refresh` timestamp — no timers. A successful refresh stamps the
/// timestamp; a failed one does not, so retries stay permitted immediately
/// after a failure.
pub struct RefreshService;

impl RefreshService {
    pub fn new() -> Self {
        Self
    }

    /// Whether the gate is open.
    pub fn can_refresh(&self, portfolio: &Portfolio) -> bool {
        self.time_until_ready(portfolio).is_zero()
    }

    /// Remaining wait until the gate reopens; zero when already Ready.
    pub fn time_until_ready(&self, portfolio: &Portfolio) -> Duration {
        let Some(last_refresh) = portfolio.last_refresh else {
            return Duration::zero();
        };
        let cooldown = Duration::hours(REFRESH_COOLDOWN_HOURS);
        let elapsed = Utc::now() - last_refresh;
        if elapsed >= cooldown {
            Duration::zero()
        } else {
            cooldown - elapsed
        }
    }

    /// Fetch fresh fund data for `symbols` through the injected provider.
    ///
    /// Fails fast with `CooldownActive` while the gate is closed. Symbols are
    /// fetched sequentially; per-symbol failures accumulate in the report
    /// instead of aborting the batch. The cooldown timestamp advances only
    /// when at least one symbol succeeds — a fully failed batch leaves
    /// `last_refresh` unchanged and retries remain permitted immediately.
    pub async fn perform_refresh(
        &self,
        portfolio: &mut Portfolio,
        provider: &dyn FundDataProvider,
        symbols: &[String],
    ) -> Result<RefreshReport, CoreError> {
        let remaining = self.time_until_ready(portfolio);
        if remaining > Duration::zero() {
            return Err(CoreError::cooldown(remaining));
        }

        let mut updated = Vec::new();
        let mut failures = Vec::new();

        for symbol in symbols {
            match provider.fetch_fund(symbol).await {
                Ok(fund) => updated.push(fund),
                Err(e) => failures.push(RefreshFailure {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        if updated.is_empty() && !symbols.is_empty() {
            return Err(CoreError::Api {
                provider: provider.name().to_string(),
                message: format!(
                    "Refresh failed for all {} symbol(s); cooldown not started",
                    symbols.len()
                ),
            });
        }

        let refreshed_at = Utc::now();
        portfolio.last_refresh = Some(refreshed_at);

        Ok(RefreshReport {
            refreshed_at,
            updated,
            failures,
        })
    }

    /// Human-readable wait time for display: "23h 12m", "45m", or
    /// "Available now" once the gate is open.
    pub fn format_wait(remaining: Duration) -> String {
        if remaining <= Duration::zero() {
            return "Available now".to_string();
        }
        let hours = remaining.num_hours();
        let minutes = remaining.num_minutes() % 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }
}

impl Default for RefreshService {
    fn default() -> Self {
        Self::new()
    }
}
